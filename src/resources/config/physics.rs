use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::{ConfigError, DEFAULT_TIMESTEP, MAX_TIMESTEP};

/// Configuration for the physics system
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed update step used by the plugin [s]
    pub timestep: f64,
    /// Largest step the integrator will take [s]
    pub max_timestep: f64,
    /// Optional speed cap [m/s]; unlimited by default
    pub max_velocity: Option<f64>,
    /// Optional rotation rate cap [rad/s]; unlimited by default
    pub max_angular_velocity: Option<f64>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            timestep: DEFAULT_TIMESTEP, // 60 Hz
            max_timestep: MAX_TIMESTEP, // 20 Hz
            max_velocity: None,
            max_angular_velocity: None,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.timestep) {
            return Err(ConfigError::invalid("timestep", self.timestep));
        }
        if !positive(self.max_timestep) {
            return Err(ConfigError::invalid("max_timestep", self.max_timestep));
        }
        if self.timestep > self.max_timestep {
            return Err(ConfigError::invalid(
                "timestep",
                format!("{} exceeds max_timestep {}", self.timestep, self.max_timestep),
            ));
        }
        if let Some(limit) = self.max_velocity.filter(|v| !positive(*v)) {
            return Err(ConfigError::invalid("max_velocity", limit));
        }
        if let Some(limit) = self.max_angular_velocity.filter(|v| !positive(*v)) {
            return Err(ConfigError::invalid("max_angular_velocity", limit));
        }
        Ok(())
    }
}
