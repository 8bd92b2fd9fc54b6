//! Pinball physics simulation
//!
//! Everything that moves lives here. The module has no rendering or platform
//! dependencies:
//! - Typed units keep forces, speeds and positions apart
//! - Bodies are shared `Arc`s so a renderer can read poses while a tick runs
//! - One tick = fields, then collisions, then integration

pub mod cinematic;
pub mod clock;
pub mod collision;
pub mod field;
pub mod hitbox;
pub mod moveable;
pub mod segment;
pub mod units;
pub mod universe;

pub use cinematic::Cinematic;
pub use clock::Clock;
pub use collision::{Contact, Detector, ShapeKind, contact_velocity, detector_for, resolve};
pub use field::{Field, Probe};
pub use hitbox::{CollisionAction, Hitbox, Shape};
pub use moveable::{Moveable, Pose};
pub use segment::Segment;
pub use units::{Acceleration, DeltaSpace, Force, Impulse, Mass, Position, Speed, Time};
pub use universe::{StepReport, Universe};
