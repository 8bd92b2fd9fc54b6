//! Thread-safe pose storage
//!
//! The simulation thread writes poses every tick while a render thread may read
//! them for display. Position and rotation live behind one lock, so each call
//! is atomic and [`Moveable::pose`] returns a consistent pair. Two separate
//! getter calls may still observe different ticks; readers that need both
//! values together must use `pose()`.

use glam::Quat;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::units::{DeltaSpace, Position};

/// Position and orientation of a body at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Position,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Position::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

#[derive(Debug, Default)]
pub struct Moveable {
    pose: Mutex<Pose>,
}

impl Moveable {
    pub fn new(position: Position, rotation: Quat) -> Self {
        Self {
            pose: Mutex::new(Pose { position, rotation }),
        }
    }

    pub fn position(&self) -> Position {
        self.pose.lock().position
    }

    pub fn rotation(&self) -> Quat {
        self.pose.lock().rotation
    }

    /// Snapshot of position and rotation taken under a single lock
    pub fn pose(&self) -> Pose {
        *self.pose.lock()
    }

    /// Replace the position, returning the displacement that was applied
    pub fn set_position(&self, position: Position) -> DeltaSpace {
        let mut pose = self.pose.lock();
        let delta = position - pose.position;
        pose.position = position;
        delta
    }

    pub fn set_rotation(&self, rotation: Quat) {
        self.pose.lock().rotation = rotation.normalize();
    }

    pub fn translate(&self, delta: DeltaSpace) {
        self.pose.lock().position += delta;
    }

    /// Apply `rotation` on top of the current orientation (world frame)
    pub fn rotate(&self, rotation: Quat) {
        let mut pose = self.pose.lock();
        pose.rotation = (rotation * pose.rotation).normalize();
    }
}
