//! The simulation world
//!
//! Bodies and fields are owned by the caller and shared in as `Arc`s; the
//! universe only tracks which of them take part. Each call to
//! [`Universe::calculate`] runs three phases in order, each finishing before
//! the next starts:
//!
//! 1. every field pushes on every body,
//! 2. every unordered pair of bodies is tested and resolved,
//! 3. every body integrates.
//!
//! Membership changes take `&mut self`, so adding or removing bodies from
//! another thread needs the caller's own lock around the universe.

use std::ops::AddAssign;
use std::sync::Arc;

use log::{debug, info, trace};

use super::clock::Clock;
use super::collision::{detector_for, resolve};
use super::field::Field;
use super::hitbox::Hitbox;
use super::units::Time;
use crate::config::PhysicsConfig;

/// What happened during one or more ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Contacts that exchanged an impulse
    pub contacts: u32,
    /// Pairs skipped because no algorithm handles their shapes (frame-frame)
    pub unsupported_pairs: u32,
}

impl AddAssign for StepReport {
    fn add_assign(&mut self, rhs: StepReport) {
        self.contacts += rhs.contacts;
        self.unsupported_pairs += rhs.unsupported_pairs;
    }
}

#[derive(Debug, Default)]
pub struct Universe {
    config: PhysicsConfig,
    bodies: Vec<Arc<Hitbox>>,
    fields: Vec<Arc<Field>>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Register a body. Adding the same body twice is not checked and makes
    /// it take part twice.
    pub fn add_body(&mut self, body: Arc<Hitbox>) {
        info!("Adding body '{}' ({:?})", body.label(), body.kind());
        self.bodies.push(body);
    }

    /// Unregister a body; does nothing if it is not registered
    pub fn remove_body(&mut self, body: &Arc<Hitbox>) {
        if let Some(index) = self.bodies.iter().position(|b| Arc::ptr_eq(b, body)) {
            info!("Removing body '{}'", body.label());
            self.bodies.remove(index);
        }
    }

    pub fn add_field(&mut self, field: Arc<Field>) {
        self.fields.push(field);
    }

    /// Unregister a field; does nothing if it is not registered
    pub fn remove_field(&mut self, field: &Arc<Field>) {
        if let Some(index) = self.fields.iter().position(|f| Arc::ptr_eq(f, field)) {
            self.fields.remove(index);
        }
    }

    pub fn bodies(&self) -> &[Arc<Hitbox>] {
        &self.bodies
    }

    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Advance the world by `elapsed`
    ///
    /// `elapsed` must be positive: impulses are turned into forces by dividing
    /// by it. With a zero step nothing moves, but the speed of any body caught
    /// in a contact becomes non-finite.
    pub fn calculate(&self, elapsed: Time) -> StepReport {
        self.apply_fields();
        let report = self.resolve_collisions(elapsed);
        for body in &self.bodies {
            body.body().advance(elapsed);
        }
        trace!(
            "Tick dt={:.4}s bodies={} contacts={}",
            elapsed.as_secs(),
            self.bodies.len(),
            report.contacts
        );
        report
    }

    /// Run every fixed step `clock` says is due after a frame of `frame_dt`
    pub fn run_frame(&self, clock: &mut Clock, frame_dt: f32) -> StepReport {
        let mut report = StepReport::default();
        for _ in 0..clock.accumulate(frame_dt) {
            report += self.calculate(clock.fixed_dt());
        }
        report
    }

    fn apply_fields(&self) {
        for body in &self.bodies {
            let kinematics = body.body();
            let probe = kinematics.probe();
            for field in &self.fields {
                // A body's own field does not act on it
                if Arc::ptr_eq(field, kinematics.field()) {
                    continue;
                }
                kinematics.add_external_force(field.calculate_applied_force(&probe));
            }
        }
    }

    fn resolve_collisions(&self, elapsed: Time) -> StepReport {
        let mut report = StepReport::default();

        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let detect = match detector_for(a.kind(), b.kind()) {
                    Ok(detect) => detect,
                    Err(err) => {
                        trace!("Skipping '{}'/'{}': {}", a.label(), b.label(), err);
                        report.unsupported_pairs += 1;
                        continue;
                    }
                };

                let Some(contact) = detect(a, b) else {
                    continue;
                };
                // Separating pairs still report the contact, they just exchange no impulse
                let impulse = resolve(a, b, &contact, self.config.restitution, elapsed)
                    .map_or(0.0, |impulse| impulse.magnitude());

                debug!(
                    "Contact '{}' <-> '{}': depth={:.3} impulse={:.3}",
                    a.label(),
                    b.label(),
                    contact.depth,
                    impulse
                );
                report.contacts += 1;
                a.on_collision(b);
                b.on_collision(a);
            }
        }
        report
    }
}
