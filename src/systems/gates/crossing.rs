use nalgebra::Vector3;

use crate::course::Gate;
use crate::utils::lerp_point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingDirection {
    /// Along the gate normal
    Forward,
    /// Against the gate normal
    Reverse,
}

/// Where a path segment passes through a gate opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateCrossing {
    /// Position along the segment [0, 1]
    pub fraction: f64,
    pub point: Vector3<f64>,
    pub direction: CrossingDirection,
}

/// Test the path `start..end` against the finite opening of `gate`.
///
/// A forward crossing starts strictly in front of the gate plane and ends
/// on or behind it. The plane intersection must fall inside the opening.
pub fn segment_crossing(
    gate: &Gate,
    start: &Vector3<f64>,
    end: &Vector3<f64>,
    allow_reverse: bool,
) -> Option<GateCrossing> {
    let d0 = gate.signed_distance(start);
    let d1 = gate.signed_distance(end);

    let direction = if d0 < 0.0 && d1 >= 0.0 {
        CrossingDirection::Forward
    } else if allow_reverse && d0 > 0.0 && d1 <= 0.0 {
        CrossingDirection::Reverse
    } else {
        return None;
    };

    let fraction = (d0 / (d0 - d1)).clamp(0.0, 1.0);
    let point = lerp_point(start, end, fraction);
    let mut local = gate.to_local(&point);
    local.z = 0.0;

    gate.opening_contains(&local).then_some(GateCrossing {
        fraction,
        point,
        direction,
    })
}
