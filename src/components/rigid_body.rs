use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::{PhysicsComponent, SpatialComponent};
use crate::utils::{quaternion_norm_residual, ConfigError, QUATERNION_NORM_TOLERANCE};

/// Full dynamic state of the spacecraft: pose and motion plus mass
/// properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    pub spatial: SpatialComponent,
    pub physics: PhysicsComponent,
}

impl RigidBodyState {
    pub fn new(spatial: SpatialComponent, physics: PhysicsComponent) -> Self {
        Self { spatial, physics }
    }

    /// A body at rest with a scalar moment of inertia.
    pub fn at_rest(
        position: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        mass: f64,
        moment_of_inertia: f64,
    ) -> Self {
        Self {
            spatial: SpatialComponent {
                position,
                attitude,
                ..Default::default()
            },
            physics: PhysicsComponent::with_scalar_inertia(mass, moment_of_inertia),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        let spatial = &self.spatial;
        let finite = |v: &Vector3<f64>| v.iter().all(|c| c.is_finite());
        if !finite(&spatial.position) {
            return Err(ConfigError::invalid("position", format!("{:?}", spatial.position)));
        }
        if !finite(&spatial.velocity) {
            return Err(ConfigError::invalid("velocity", format!("{:?}", spatial.velocity)));
        }
        if quaternion_norm_residual(&spatial.attitude) > QUATERNION_NORM_TOLERANCE {
            return Err(ConfigError::invalid(
                "attitude",
                format!("{:?}", spatial.attitude.coords),
            ));
        }
        if !finite(&spatial.angular_velocity) {
            return Err(ConfigError::invalid(
                "angular_velocity",
                format!("{:?}", spatial.angular_velocity),
            ));
        }
        Ok(())
    }
}
