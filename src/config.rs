//! Simulation tuning
//!
//! Loaded from a JSON file by the table binary; every field falls back to its
//! default when missing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::PhysicsError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Global restitution coefficient (1.0 = perfectly elastic)
    pub restitution: f32,
    /// Fixed simulation step in seconds
    pub fixed_dt: f32,
    /// Maximum fixed steps per rendered frame (prevents spiral of death)
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            restitution: consts::RESTITUTION,
            fixed_dt: consts::SIM_DT,
            max_substeps: consts::MAX_SUBSTEPS,
        }
    }
}

impl PhysicsConfig {
    pub fn from_json(json: &str) -> Result<Self, PhysicsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot step with
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.fixed_dt.is_finite() && self.fixed_dt > 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "fixed_dt must be a positive number of seconds, got {}",
                self.fixed_dt
            )));
        }
        if !(self.restitution.is_finite() && self.restitution >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "restitution must be non-negative, got {}",
                self.restitution
            )));
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidConfig(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, PhysicsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhysicsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded physics config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PhysicsError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = PhysicsConfig::from_json(r#"{ "restitution": 0.8 }"#).unwrap();
        assert_eq!(config.restitution, 0.8);
        assert_eq!(config.fixed_dt, consts::SIM_DT);
        assert_eq!(config.max_substeps, consts::MAX_SUBSTEPS);
    }

    #[test]
    fn test_json_round_trip() {
        let config = PhysicsConfig {
            max_substeps: 3,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(PhysicsConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = PhysicsConfig::from_json("{ restitution: ").unwrap_err();
        assert!(matches!(err, PhysicsError::Json(_)));
    }

    #[test]
    fn test_unsteppable_values_are_rejected() {
        for json in [
            r#"{ "fixed_dt": 0.0 }"#,
            r#"{ "fixed_dt": -0.01 }"#,
            r#"{ "restitution": -0.5 }"#,
            r#"{ "max_substeps": 0 }"#,
        ] {
            let err = PhysicsConfig::from_json(json).unwrap_err();
            assert!(matches!(err, PhysicsError::InvalidConfig(_)), "{json}");
        }

        let nan_step = PhysicsConfig {
            fixed_dt: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            nan_step.validate(),
            Err(PhysicsError::InvalidConfig(_))
        ));
        assert!(PhysicsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = PhysicsConfig::load("/nonexistent/flipper.json").unwrap_err();
        assert!(matches!(err, PhysicsError::Io(_)));
    }
}
