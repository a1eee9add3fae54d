use bevy::prelude::*;
use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::components::{PhysicsComponent, PilotInput, SpatialComponent};
use crate::utils::{body_forward, world_inertia};

/// Thruster forces and lever arms of one spacecraft.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlLimits {
    /// Main thruster force at the smallest non-zero throttle [N]
    pub min_thrust: f64,
    /// Main thruster force at full throttle [N]
    pub max_thrust: f64,
    /// Steering thruster force [N]
    pub steering_force: f64,
    /// Lever arms about body X, Y and Z [m]
    pub pitch_arm: f64,
    pub yaw_arm: f64,
    pub roll_arm: f64,
    /// [1/s]
    pub flight_assist_damping: f64,
}

/// World-frame loads produced by the pilot's commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlForces {
    pub force: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl ControlForces {
    pub fn zero() -> Self {
        Self {
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
        }
    }
}

/// Main thruster output for a throttle setting. Any non-zero throttle
/// lights the engine at no less than `min_thrust`.
pub fn main_thrust(throttle: f64, limits: &ControlLimits) -> f64 {
    if throttle > 0.0 {
        limits.min_thrust + (limits.max_thrust - limits.min_thrust) * throttle.min(1.0)
    } else {
        0.0
    }
}

/// Map pilot commands to the world-frame force and torque on the ship.
///
/// Thrust acts along body +Z. Pitch, yaw and roll commands fire the
/// steering thrusters about body X, Y and Z. With no rotation commanded,
/// flight assist adds `-k * I_world * w` to bleed off the spin.
pub fn map_controls(
    input: &PilotInput,
    attitude: &UnitQuaternion<f64>,
    angular_velocity: &Vector3<f64>,
    inertia_body: &Matrix3<f64>,
    limits: &ControlLimits,
) -> ControlForces {
    let input = input.clamped();

    let force = attitude * (body_forward() * main_thrust(input.throttle, limits));

    let steering = limits.steering_force;
    let body_torque = Vector3::new(
        input.pitch * steering * limits.pitch_arm,
        input.yaw * steering * limits.yaw_arm,
        input.roll * steering * limits.roll_arm,
    );
    let mut torque = attitude * body_torque;

    if !input.has_rotation_command() && limits.flight_assist_damping > 0.0 {
        let inertia_world = world_inertia(attitude, inertia_body);
        torque -= limits.flight_assist_damping * inertia_world * angular_velocity;
    }

    ControlForces { force, torque }
}

/// Writes each ship's control loads into its `PhysicsComponent` ahead of
/// integration.
pub fn control_mapper_system(
    mut query: Query<(
        &PilotInput,
        &ControlLimits,
        &SpatialComponent,
        &mut PhysicsComponent,
    )>,
) {
    for (input, limits, spatial, mut physics) in query.iter_mut() {
        let controls = map_controls(
            input,
            &spatial.attitude,
            &spatial.angular_velocity,
            &physics.inertia,
            limits,
        );
        physics.net_force = controls.force;
        physics.net_moment = controls.torque;
    }
}
