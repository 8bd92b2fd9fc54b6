//! Position-anchored force fields
//!
//! A field is a function of its anchor position and of the body being queried.
//! Gravity, air friction, wind and bumper magnets are all fields.

use std::fmt;

use parking_lot::Mutex;

use super::units::{Acceleration, DeltaSpace, Force, Mass, Position, Speed};
use crate::consts::IMMOVABLE_MASS;

/// Below this distance an attraction field stops pulling (avoids the 1/r² pole)
pub const ATTRACTION_CORE_RADIUS: f32 = 1e-3;

/// Kinematic sample of the body a field is evaluated against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Probe {
    pub position: Position,
    pub speed: Speed,
    pub mass: Mass,
}

impl Probe {
    /// Walls and flippers: mass-proportional fields leave them alone
    pub fn is_immovable(&self) -> bool {
        self.mass.kg() >= IMMOVABLE_MASS
    }
}

type ForceFn = dyn Fn(Position, &Probe) -> Force + Send + Sync;

pub struct Field {
    anchor: Mutex<Position>,
    force: Box<ForceFn>,
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("anchor", &*self.anchor.lock())
            .finish_non_exhaustive()
    }
}

impl Field {
    /// Build a field from a force function `f(anchor, probe)`
    pub fn new<F>(anchor: Position, f: F) -> Self
    where
        F: Fn(Position, &Probe) -> Force + Send + Sync + 'static,
    {
        Self {
            anchor: Mutex::new(anchor),
            force: Box::new(f),
        }
    }

    /// A field that never pushes anything
    pub fn none() -> Self {
        Self::new(Position::ZERO, |_, _| Force::ZERO)
    }

    /// Same force everywhere (wind, a tilted table's slope)
    pub fn uniform(force: Force) -> Self {
        Self::new(Position::ZERO, move |_, _| force)
    }

    /// Mass-proportional pull, so every body falls with the same acceleration
    ///
    /// Immovable bodies are skipped: the table holds them up.
    pub fn gravity(g: Acceleration) -> Self {
        Self::new(Position::ZERO, move |_, probe| {
            if probe.is_immovable() {
                return Force::ZERO;
            }
            Force::from_vec(g.vec() * probe.mass.kg())
        })
    }

    /// Linear drag opposing the body's speed: `F = -k·v`
    pub fn friction(coefficient: f32) -> Self {
        Self::new(Position::ZERO, move |_, probe| {
            Force::from_vec(-probe.speed.vec() * coefficient)
        })
    }

    /// Inverse-square pull toward the anchor, `F = strength·m / r²`
    ///
    /// Negative strength repels. Immovable bodies are skipped.
    pub fn attraction(anchor: Position, strength: f32) -> Self {
        Self::new(anchor, move |anchor, probe| {
            if probe.is_immovable() {
                return Force::ZERO;
            }
            let offset = (anchor - probe.position).vec();
            let distance = offset.length();
            if distance < ATTRACTION_CORE_RADIUS {
                return Force::ZERO;
            }
            let magnitude = strength * probe.mass.kg() / (distance * distance);
            Force::from_vec(offset / distance * magnitude)
        })
    }

    pub fn position(&self) -> Position {
        *self.anchor.lock()
    }

    pub fn set_position(&self, position: Position) {
        *self.anchor.lock() = position;
    }

    pub fn translate(&self, delta: DeltaSpace) {
        *self.anchor.lock() += delta;
    }

    /// Force this field exerts on a body described by `probe`
    pub fn calculate_applied_force(&self, probe: &Probe) -> Force {
        let anchor = self.position();
        (self.force)(anchor, probe)
    }
}
