use bevy::prelude::*;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::ConfigError;

/// Mass properties and the net loads accumulated for the current tick.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsComponent {
    pub mass: f64,
    /// Body-frame inertia tensor [kg m^2]
    pub inertia: Matrix3<f64>,
    pub inertia_inv: Matrix3<f64>,
    /// World-frame force [N]
    pub net_force: Vector3<f64>,
    /// World-frame torque [N m]
    pub net_moment: Vector3<f64>,
}

impl PhysicsComponent {
    pub fn new(mass: f64, inertia: Matrix3<f64>) -> Self {
        let inertia_inv = inertia.try_inverse().unwrap_or_else(Matrix3::zeros);
        Self {
            mass,
            inertia,
            inertia_inv,
            net_force: Vector3::zeros(),
            net_moment: Vector3::zeros(),
        }
    }

    /// Isotropic body with a scalar moment of inertia.
    pub fn with_scalar_inertia(mass: f64, moment_of_inertia: f64) -> Self {
        Self::new(mass, Matrix3::identity() * moment_of_inertia)
    }

    /// Mass and inertia must describe a physical body before a session may
    /// integrate it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        if self.inertia.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::InvalidInertia);
        }
        // Positive definite: every leading principal minor is positive
        let minor_1 = self.inertia[(0, 0)];
        let minor_2 = self.inertia[(0, 0)] * self.inertia[(1, 1)]
            - self.inertia[(0, 1)] * self.inertia[(1, 0)];
        let minor_3 = self.inertia.determinant();
        if minor_1 <= 0.0 || minor_2 <= 0.0 || minor_3 <= 0.0 {
            return Err(ConfigError::InvalidInertia);
        }
        Ok(())
    }
}
