//! Flipper - physics core for a pinball table
//!
//! Core modules:
//! - `sim`: Bodies, fields, collisions and the `Universe` tick
//! - `config`: Data-driven simulation tuning
//! - `error`: Library error type

pub mod config;
pub mod error;
pub mod sim;

pub use config::PhysicsConfig;
pub use error::PhysicsError;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Perfectly elastic collisions
    pub const RESTITUTION: f32 = 1.0;
    /// Stand-in for infinite mass; finite so force / mass stays finite
    pub const IMMOVABLE_MASS: f32 = f32::MAX / 10.0;

    /// Table gravity along -Y, m/s² (a real table is tilted, so less than g)
    pub const TABLE_GRAVITY: f32 = 5.5;
}
