//! Fixed-timestep accumulator
//!
//! Turns variable frame times into a whole number of fixed simulation steps.

use log::trace;

use super::units::Time;
use crate::config::PhysicsConfig;

/// Frame times above this are clamped (debugger pauses, minimised windows)
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Clock {
    fixed_dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl Clock {
    pub fn new(fixed_dt: f32, max_substeps: u32) -> Self {
        Self {
            fixed_dt,
            max_substeps,
            accumulator: 0.0,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.fixed_dt, config.max_substeps)
    }

    pub fn fixed_dt(&self) -> Time {
        Time::seconds(self.fixed_dt)
    }

    /// Add a frame's worth of time; returns how many fixed steps are due
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < self.max_substeps {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }

        // Behind by more than the substep cap: drop the backlog
        if self.accumulator >= self.fixed_dt {
            trace!(
                "Dropping {:.4}s of simulation backlog after {} substeps",
                self.accumulator,
                steps
            );
            self.accumulator %= self.fixed_dt;
        }
        steps
    }

    /// How far into the next step the current frame falls (0..1)
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.fixed_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_and_remainder() {
        // Power-of-two step keeps the arithmetic exact
        let mut clock = Clock::new(1.0 / 64.0, 8);
        assert_eq!(clock.accumulate(2.5 / 64.0), 2);
        assert_eq!(clock.alpha(), 0.5);
        assert_eq!(clock.accumulate(0.5 / 64.0), 1);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_substep_cap_drops_backlog() {
        let mut clock = Clock::new(0.01, 4);
        assert_eq!(clock.accumulate(0.05), 4);
        assert!(clock.alpha() < 1.0);
        // Huge frame times are clamped first
        assert_eq!(clock.accumulate(10.0), 4);
    }

    #[test]
    fn test_negative_frame_time_ignored() {
        let mut clock = Clock::new(0.01, 4);
        assert_eq!(clock.accumulate(-1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
