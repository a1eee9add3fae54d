use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::{PhysicsComponent, RigidBodyState, SpatialComponent};
use crate::systems::controller::ControlLimits;
use crate::utils::{
    cuboid_inertia, ConfigError, FLIGHT_ASSIST_DAMPING, MAIN_THRUSTER_MAX_FORCE,
    MAIN_THRUSTER_MIN_FORCE, SHIP_BOUNDING_RADIUS, SHIP_HEIGHT, SHIP_LENGTH, SHIP_MASS,
    SHIP_WIDTH, STEERING_THRUSTER_FORCE,
};

/// Physical description of the race ship.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacecraftConfig {
    pub name: String,

    /// Mass [kg]
    pub mass: f64,

    /// Hull extents along body X, Y and Z [m]
    pub width: f64,
    pub height: f64,
    pub length: f64,

    /// Collision sphere radius [m]
    pub bounding_radius: f64,

    /// Main thruster force at the lowest and highest non-zero throttle [N]
    pub main_thruster_min_force: f64,
    pub main_thruster_max_force: f64,

    /// Force of each steering thruster [N]
    pub steering_thruster_force: f64,

    /// Rotation damping applied while no rotation is commanded [1/s]
    pub flight_assist_damping: f64,
}

impl Default for SpacecraftConfig {
    fn default() -> Self {
        Self {
            name: "Racer".to_string(),
            mass: SHIP_MASS,
            width: SHIP_WIDTH,
            height: SHIP_HEIGHT,
            length: SHIP_LENGTH,
            bounding_radius: SHIP_BOUNDING_RADIUS,
            main_thruster_min_force: MAIN_THRUSTER_MIN_FORCE,
            main_thruster_max_force: MAIN_THRUSTER_MAX_FORCE,
            steering_thruster_force: STEERING_THRUSTER_FORCE,
            flight_assist_damping: FLIGHT_ASSIST_DAMPING,
        }
    }
}

impl SpacecraftConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading spacecraft config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config: SpacecraftConfig = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("length", self.length),
            ("bounding_radius", self.bounding_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(name, value));
            }
        }
        for (name, value) in [
            ("main_thruster_min_force", self.main_thruster_min_force),
            ("main_thruster_max_force", self.main_thruster_max_force),
            ("steering_thruster_force", self.steering_thruster_force),
            ("flight_assist_damping", self.flight_assist_damping),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(name, value));
            }
        }
        if self.main_thruster_min_force > self.main_thruster_max_force {
            return Err(ConfigError::invalid(
                "main_thruster_min_force",
                format!(
                    "{} exceeds main_thruster_max_force {}",
                    self.main_thruster_min_force, self.main_thruster_max_force
                ),
            ));
        }
        Ok(())
    }

    /// Thruster forces and lever arms derived from the hull.
    pub fn control_limits(&self) -> ControlLimits {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        ControlLimits {
            min_thrust: self.main_thruster_min_force,
            max_thrust: self.main_thruster_max_force,
            steering_force: self.steering_thruster_force,
            pitch_arm: self.length / 2.0,
            yaw_arm: half_width,
            roll_arm: (half_width.powi(2) + half_height.powi(2)).sqrt(),
            flight_assist_damping: self.flight_assist_damping,
        }
    }

    pub fn physics(&self) -> PhysicsComponent {
        PhysicsComponent::new(
            self.mass,
            cuboid_inertia(self.mass, self.width, self.height, self.length),
        )
    }

    /// Ship at rest at the given pose.
    pub fn rigid_body(
        &self,
        position: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
    ) -> RigidBodyState {
        RigidBodyState::new(
            SpatialComponent {
                position,
                attitude,
                ..Default::default()
            },
            self.physics(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_ship() {
        let config = SpacecraftConfig::default();
        assert!(config.validate().is_ok());

        let physics = config.physics();
        assert_eq!(physics.mass, 20000.0);
        // I_zz = m (w^2 + h^2) / 12
        assert_relative_eq!(physics.inertia[(2, 2)], 20000.0 * 450.0 / 12.0, epsilon = 1e-9);
        assert!(physics.validate().is_ok());
    }

    #[test]
    fn test_control_limits_from_hull() {
        let limits = SpacecraftConfig::default().control_limits();
        assert_eq!(limits.pitch_arm, 20.0);
        assert_eq!(limits.yaw_arm, 7.5);
        assert_relative_eq!(limits.roll_arm, (2.0 * 7.5f64.powi(2)).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_thruster_range_checked() {
        let config = SpacecraftConfig {
            main_thruster_min_force: 5000.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SpacecraftConfig {
            name: "Heavy".to_string(),
            mass: 35000.0,
            ..Default::default()
        };
        let file = NamedTempFile::new().unwrap();
        config.to_yaml(file.path()).unwrap();
        let loaded = SpacecraftConfig::from_yaml(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: SpacecraftConfig = serde_yaml::from_str("mass: 1000.0\n").unwrap();
        assert_eq!(config.mass, 1000.0);
        assert_eq!(config.bounding_radius, 20.0);
    }
}
