use crate::components::{PhysicsComponent, PreviousPosition, SpatialComponent};
use crate::resources::PhysicsConfig;
use crate::utils::{renormalize, rotation_from_angular_velocity};
use bevy::prelude::*;
use nalgebra::Vector3;

/// System to integrate physics and update spatial states for entities.
/// Records the pre-step position for the swept collision and gate tests.
///
/// # Arguments
/// - `query`: Entities with `PhysicsComponent` and `SpatialComponent`.
/// - `config`: Physics configuration resource for the step and velocity limits.
pub fn physics_integrator_system(
    mut query: Query<(
        &PhysicsComponent,
        &mut SpatialComponent,
        Option<&mut PreviousPosition>,
    )>,
    config: Res<PhysicsConfig>,
) {
    let dt = config.timestep.min(config.max_timestep);
    let max_vel = config.max_velocity;
    let max_ang_vel = config.max_angular_velocity;

    query
        .par_iter_mut()
        .for_each(|(physics, mut spatial, previous)| {
            if let Some(mut previous) = previous {
                previous.0 = spatial.position;
            }
            integrate_with_limits(physics, &mut spatial, dt, max_vel, max_ang_vel);
        });
}

/// Advance a body by `dt` with semi-implicit Euler using the world-frame
/// net force and moment held in `physics`.
///
/// Velocity is updated first and the new velocity moves the body; the same
/// holds for angular velocity and attitude. A non-positive or non-finite
/// `dt` leaves the state untouched.
pub fn integrate_state(physics: &PhysicsComponent, spatial: &mut SpatialComponent, dt: f64) {
    integrate_with_limits(physics, spatial, dt, None, None);
}

/// [`integrate_state`] with optional caps on speed [m/s] and rotation rate
/// [rad/s]. Caps apply to the updated velocities before they move the body,
/// so position and attitude always agree with the stored velocities.
pub fn integrate_with_limits(
    physics: &PhysicsComponent,
    spatial: &mut SpatialComponent,
    dt: f64,
    max_velocity: Option<f64>,
    max_angular_velocity: Option<f64>,
) {
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }

    // Linear
    let acceleration = physics.net_force / physics.mass;
    spatial.velocity += acceleration * dt;
    limit_norm(&mut spatial.velocity, max_velocity);
    spatial.position += spatial.velocity * dt;

    // Angular: I_world^-1 = R I_body^-1 R^T
    let rotation = spatial.attitude.to_rotation_matrix();
    let inertia_world_inv =
        rotation.matrix() * physics.inertia_inv * rotation.matrix().transpose();
    spatial.angular_velocity += inertia_world_inv * physics.net_moment * dt;
    limit_norm(&mut spatial.angular_velocity, max_angular_velocity);

    let step_rotation = rotation_from_angular_velocity(&spatial.angular_velocity, dt);
    spatial.attitude = renormalize(&(step_rotation * spatial.attitude));
}

fn limit_norm(v: &mut Vector3<f64>, limit: Option<f64>) {
    if let Some(limit) = limit {
        let norm = v.norm();
        if norm > limit {
            *v *= limit / norm;
        }
    }
}
