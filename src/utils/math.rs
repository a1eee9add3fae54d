use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};

use super::constants::NORMALIZE_EPSILON;

/// Body frame axes: +X right, +Y up, +Z forward.
pub fn body_right() -> Vector3<f64> {
    Vector3::x()
}

pub fn body_up() -> Vector3<f64> {
    Vector3::y()
}

pub fn body_forward() -> Vector3<f64> {
    Vector3::z()
}

/// Unit vector in the direction of `v`, or the zero vector when `v` has no
/// usable direction.
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(NORMALIZE_EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Build an orientation from yaw (about +Y), pitch (about +X) and roll
/// (about +Z), applied in that order.
pub fn orientation_from_yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), roll)
}

/// Quaternion from scalar-first components. `None` for a zero or non-finite
/// quaternion.
pub fn orientation_from_wxyz(w: f64, x: f64, y: f64, z: f64) -> Option<UnitQuaternion<f64>> {
    let q = Quaternion::new(w, x, y, z);
    let norm = q.norm();
    if !norm.is_finite() || norm < NORMALIZE_EPSILON {
        return None;
    }
    Some(UnitQuaternion::from_quaternion(q))
}

/// Scalar-first components of an orientation.
pub fn orientation_to_wxyz(q: &UnitQuaternion<f64>) -> [f64; 4] {
    [q.w, q.i, q.j, q.k]
}

/// Rotation produced by turning at `angular_velocity` (world frame) for `dt`.
pub fn rotation_from_angular_velocity(angular_velocity: &Vector3<f64>, dt: f64) -> UnitQuaternion<f64> {
    let scaled_axis = angular_velocity * dt;
    if scaled_axis.norm() > NORMALIZE_EPSILON {
        UnitQuaternion::from_scaled_axis(scaled_axis)
    } else {
        UnitQuaternion::identity()
    }
}

/// Strip accumulated drift from a unit quaternion.
pub fn renormalize(q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    let raw = q.into_inner();
    let norm = raw.norm();
    if norm.is_finite() && norm > NORMALIZE_EPSILON {
        UnitQuaternion::new_unchecked(raw / norm)
    } else {
        UnitQuaternion::identity()
    }
}

/// How far the stored quaternion has drifted from unit length.
pub fn quaternion_norm_residual(q: &UnitQuaternion<f64>) -> f64 {
    (q.into_inner().norm() - 1.0).abs()
}

/// Rotate a body-frame inertia tensor into the world frame.
pub fn world_inertia(attitude: &UnitQuaternion<f64>, inertia_body: &Matrix3<f64>) -> Matrix3<f64> {
    let rotation = attitude.to_rotation_matrix();
    rotation.matrix() * inertia_body * rotation.matrix().transpose()
}

/// Inertia tensor of a solid cuboid with the given extents along the body
/// X, Y and Z axes.
pub fn cuboid_inertia(mass: f64, width: f64, height: f64, length: f64) -> Matrix3<f64> {
    let i_xx = mass * (height.powi(2) + length.powi(2)) / 12.0;
    let i_yy = mass * (width.powi(2) + length.powi(2)) / 12.0;
    let i_zz = mass * (width.powi(2) + height.powi(2)) / 12.0;
    Matrix3::from_diagonal(&Vector3::new(i_xx, i_yy, i_zz))
}

/// Parameter in [0, 1] of the point on segment `start..end` closest to `point`.
pub fn closest_segment_parameter(
    start: &Vector3<f64>,
    end: &Vector3<f64>,
    point: &Vector3<f64>,
) -> f64 {
    let segment = end - start;
    let length_sq = segment.norm_squared();
    if length_sq < NORMALIZE_EPSILON {
        return 0.0;
    }
    ((point - start).dot(&segment) / length_sq).clamp(0.0, 1.0)
}

/// Linear interpolation between two points
#[inline]
pub fn lerp_point(start: &Vector3<f64>, end: &Vector3<f64>, t: f64) -> Vector3<f64> {
    start + (end - start) * t
}
