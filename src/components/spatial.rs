use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::utils::{body_forward, body_right, body_up};

/// Pose and motion of a body in the world frame.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialComponent {
    /// Position in world space [m]
    pub position: Vector3<f64>,

    /// Linear velocity in world space [m/s]
    pub velocity: Vector3<f64>,

    /// Attitude quaternion (rotation from body to world frame)
    pub attitude: UnitQuaternion<f64>,

    /// Angular velocity in world frame [rad/s]
    pub angular_velocity: Vector3<f64>,
}

impl Default for SpatialComponent {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl SpatialComponent {
    pub fn new(
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
        angular_velocity: Vector3<f64>,
    ) -> Self {
        Self {
            position,
            velocity,
            attitude,
            angular_velocity,
        }
    }

    pub fn forward(&self) -> Vector3<f64> {
        self.attitude * body_forward()
    }

    pub fn up(&self) -> Vector3<f64> {
        self.attitude * body_up()
    }

    pub fn right(&self) -> Vector3<f64> {
        self.attitude * body_right()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Position at the start of the current tick, used for swept tests.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PreviousPosition(pub Vector3<f64>);
