//! Kinematic bodies
//!
//! A [`Cinematic`] adds mass, speed and force accumulation to a [`Moveable`]
//! and advances itself with semi-implicit Euler. It also carries a field of
//! its own (a bumper magnet, say) whose anchor moves with the body.

use std::sync::Arc;

use glam::Quat;
use parking_lot::Mutex;

use super::field::{Field, Probe};
use super::moveable::{Moveable, Pose};
use super::units::{Acceleration, DeltaSpace, Force, Mass, Position, Speed, Time};

/// Mutable dynamic state, guarded as one unit
#[derive(Debug, Clone, Copy)]
struct Kinematics {
    mass: Mass,
    speed: Speed,
    acceleration: Acceleration,
    /// Constant self-propulsion (motors, plungers)
    internal_force: Force,
    /// Forces injected during the current tick, cleared by `advance`
    impulsive_force: Force,
    /// Spin about +Z in rad/s
    angular_speed: f32,
}

#[derive(Debug)]
pub struct Cinematic {
    moveable: Moveable,
    state: Mutex<Kinematics>,
    field: Arc<Field>,
}

impl Cinematic {
    /// `mass` must be strictly positive; use [`crate::consts::IMMOVABLE_MASS`]
    /// for walls and flippers.
    pub fn new(position: Position, rotation: Quat, mass: Mass) -> Self {
        Self::with_field(position, rotation, mass, Field::none())
    }

    /// Body emitting `field`; the field's anchor is moved onto `position`
    pub fn with_field(position: Position, rotation: Quat, mass: Mass, field: Field) -> Self {
        field.set_position(position);
        Self {
            moveable: Moveable::new(position, rotation),
            state: Mutex::new(Kinematics {
                mass,
                speed: Speed::ZERO,
                acceleration: Acceleration::ZERO,
                internal_force: Force::ZERO,
                impulsive_force: Force::ZERO,
                angular_speed: 0.0,
            }),
            field: Arc::new(field),
        }
    }

    pub fn position(&self) -> Position {
        self.moveable.position()
    }

    pub fn rotation(&self) -> Quat {
        self.moveable.rotation()
    }

    pub fn pose(&self) -> Pose {
        self.moveable.pose()
    }

    /// Teleport the body; the emitted field is shifted by the same delta
    pub fn set_position(&self, position: Position) {
        let delta = self.moveable.set_position(position);
        self.field.translate(delta);
    }

    pub fn set_rotation(&self, rotation: Quat) {
        self.moveable.set_rotation(rotation);
    }

    pub fn mass(&self) -> Mass {
        self.state.lock().mass
    }

    pub fn set_mass(&self, mass: Mass) {
        self.state.lock().mass = mass;
    }

    pub fn speed(&self) -> Speed {
        self.state.lock().speed
    }

    pub fn set_speed(&self, speed: Speed) {
        self.state.lock().speed = speed;
    }

    /// Acceleration computed by the last `advance`
    pub fn acceleration(&self) -> Acceleration {
        self.state.lock().acceleration
    }

    pub fn internal_force(&self) -> Force {
        self.state.lock().internal_force
    }

    pub fn set_internal_force(&self, force: Force) {
        self.state.lock().internal_force = force;
    }

    /// Forces accumulated so far this tick
    pub fn pending_force(&self) -> Force {
        self.state.lock().impulsive_force
    }

    pub fn angular_speed(&self) -> f32 {
        self.state.lock().angular_speed
    }

    pub fn set_angular_speed(&self, radians_per_sec: f32) {
        self.state.lock().angular_speed = radians_per_sec;
    }

    /// Field emitted by this body, anchored at its position
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// Inject a force for the current tick only. Calls within a tick add up.
    pub fn add_external_force(&self, force: Force) {
        self.state.lock().impulsive_force += force;
    }

    /// Sample used to evaluate fields against this body
    pub fn probe(&self) -> Probe {
        let position = self.position();
        let state = self.state.lock();
        Probe {
            position,
            speed: state.speed,
            mass: state.mass,
        }
    }

    /// Integrate one step of `elapsed` seconds
    ///
    /// The new speed is used for the position update (semi-implicit Euler).
    /// Pending forces are consumed whatever `elapsed` is. A zero step never
    /// moves the body, even if a force divided by that zero step has left the
    /// speed non-finite.
    pub fn advance(&self, elapsed: Time) {
        let (displacement, spin) = {
            let mut state = self.state.lock();
            state.acceleration = (state.impulsive_force + state.internal_force) / state.mass;
            state.impulsive_force = Force::ZERO;
            let acceleration = state.acceleration;
            state.speed += acceleration * elapsed;
            if elapsed == Time::ZERO {
                (DeltaSpace::ZERO, 0.0)
            } else {
                (state.speed * elapsed, state.angular_speed * elapsed.as_secs())
            }
        };

        if displacement != DeltaSpace::ZERO {
            self.moveable.translate(displacement);
            self.field.translate(displacement);
        }
        if spin != 0.0 {
            self.moveable.rotate(Quat::from_rotation_z(spin));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn body(mass: f32) -> Cinematic {
        Cinematic::new(Position::ZERO, Quat::IDENTITY, Mass::new(mass))
    }

    #[test]
    fn test_constant_force_speed() {
        let b = body(2.0);
        b.set_internal_force(Force::new(4.0, 0.0, 0.0));
        let dt = Time::seconds(0.01);
        for _ in 0..100 {
            b.advance(dt);
        }
        // (F/m) * n * dt = 2 * 1.0
        assert!((b.speed().vec().x - 2.0).abs() < 1e-4);
        assert_eq!(b.acceleration(), Acceleration::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_semi_implicit_position_step() {
        let b = body(1.0);
        b.add_external_force(Force::new(0.0, 10.0, 0.0));
        b.advance(Time::seconds(0.5));
        // v = 5, x = v * dt with the updated speed
        assert_eq!(b.speed(), Speed::new(0.0, 5.0, 0.0));
        assert_eq!(b.position(), Position::new(0.0, 2.5, 0.0));
    }

    #[test]
    fn test_external_force_accumulates_then_resets() {
        let b = body(1.0);
        b.add_external_force(Force::new(1.0, 0.0, 0.0));
        b.add_external_force(Force::new(2.0, 0.0, 0.0));
        assert_eq!(b.pending_force(), Force::new(3.0, 0.0, 0.0));

        b.advance(Time::seconds(1.0));
        assert_eq!(b.pending_force(), Force::ZERO);
        assert_eq!(b.speed(), Speed::new(3.0, 0.0, 0.0));

        // No new force: speed holds
        b.advance(Time::seconds(1.0));
        assert_eq!(b.speed(), Speed::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_field_follows_body() {
        let b = Cinematic::with_field(
            Position::new(1.0, 0.0, 0.0),
            Quat::IDENTITY,
            Mass::new(1.0),
            Field::attraction(Position::ZERO, 1.0),
        );
        assert_eq!(b.field().position(), Position::new(1.0, 0.0, 0.0));

        b.set_position(Position::new(3.0, 1.0, 0.0));
        assert_eq!(b.field().position(), Position::new(3.0, 1.0, 0.0));

        b.set_speed(Speed::new(1.0, 0.0, 0.0));
        b.advance(Time::seconds(1.0));
        assert_eq!(b.position(), Position::new(4.0, 1.0, 0.0));
        assert_eq!(b.field().position(), Position::new(4.0, 1.0, 0.0));
    }

    #[test]
    fn test_angular_speed_rotates_about_z() {
        let b = body(1.0);
        b.set_angular_speed(std::f32::consts::PI);
        b.advance(Time::seconds(0.5));
        let x = b.rotation() * glam::Vec3::X;
        assert!((x - glam::Vec3::Y).length() < 1e-5);
        assert_eq!(b.position(), Position::ZERO);
    }

    proptest! {
        #[test]
        fn prop_resting_body_stays_put(
            x in -100.0f32..100.0,
            y in -100.0f32..100.0,
            mass in 0.1f32..50.0,
            dt in 0.0f32..1.0,
        ) {
            let b = Cinematic::new(Position::new(x, y, 0.0), Quat::IDENTITY, Mass::new(mass));
            b.advance(Time::seconds(dt));
            prop_assert_eq!(b.position(), Position::new(x, y, 0.0));
            prop_assert_eq!(b.speed(), Speed::ZERO);
        }
    }
}
