use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Tuning values for a level session. Every field has a default, so a
/// partial JSON object is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lift progress per second; 5.0 lifts a cube fully in 0.2 s.
    pub lift_rate: f32,
    /// Held-cube spin in radians per second.
    pub spin_speed: f32,
    pub arm_radius_idle: f32,
    pub arm_radius_grab: f32,
    /// Fraction of the remaining distance covered per advance.
    pub follow_factor: f32,
    pub snap_epsilon: f32,
    pub camera_rotation_step: f32,
    pub camera_pan_step: f32,
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lift_rate: 5.0,
            spin_speed: 2.0,
            arm_radius_idle: 0.05,
            arm_radius_grab: 0.5,
            follow_factor: 0.5,
            snap_epsilon: 0.05,
            camera_rotation_step: std::f32::consts::FRAC_PI_6,
            camera_pan_step: 1.0,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("lift_rate", self.lift_rate),
            ("spin_speed", self.spin_speed),
            ("arm_radius_idle", self.arm_radius_idle),
            ("arm_radius_grab", self.arm_radius_grab),
            ("snap_epsilon", self.snap_epsilon),
            ("camera_rotation_step", self.camera_rotation_step),
            ("camera_pan_step", self.camera_pan_step),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(self.follow_factor > 0.0 && self.follow_factor <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "follow_factor must be in (0, 1], got {}",
                self.follow_factor
            )));
        }
        Ok(())
    }
}

/// Moves `source` toward `target` by `factor` of the gap, snapping once the
/// gap drops under `epsilon`.
pub fn approach(source: f32, target: f32, factor: f32, epsilon: f32) -> f32 {
    let delta = target - source;
    if delta.abs() < epsilon {
        target
    } else {
        source + factor * delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = SessionConfig::from_json_str(r#"{ "lift_rate": 2.5, "seed": 7 }"#).unwrap();
        assert_eq!(c.lift_rate, 2.5);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.spin_speed, SessionConfig::default().spin_speed);
    }

    #[test]
    fn rejects_bad_values() {
        let err = SessionConfig::from_json_str(r#"{ "lift_rate": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = SessionConfig::from_json_str(r#"{ "follow_factor": 1.5 }"#).unwrap_err();
        assert!(err.to_string().contains("follow_factor"));
        let err = SessionConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn approach_snaps_when_close() {
        assert_eq!(approach(0.0, 2.0, 0.5, 0.05), 1.0);
        assert_eq!(approach(1.98, 2.0, 0.5, 0.05), 2.0);
    }
}
