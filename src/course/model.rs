use bevy::log::warn;
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::utils::{body_forward, LoadError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GateId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId(pub u32);

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

impl fmt::Display for AsteroidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.0)
    }
}

/// The three asteroid meshes a course can place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidModel {
    Jagged,
    Lumpy,
    Oblong,
}

impl AsteroidModel {
    pub const ALL: [AsteroidModel; 3] = [
        AsteroidModel::Jagged,
        AsteroidModel::Lumpy,
        AsteroidModel::Oblong,
    ];

    pub fn from_variant(variant: u8) -> Option<Self> {
        match variant {
            1 => Some(AsteroidModel::Jagged),
            2 => Some(AsteroidModel::Lumpy),
            3 => Some(AsteroidModel::Oblong),
            _ => None,
        }
    }

    /// Accepts designer model ids such as `asteroid_jagged_1`; the trailing
    /// digit selects the variant.
    pub fn from_model_id(model_id: &str) -> Option<Self> {
        let digit = model_id.trim().chars().last()?.to_digit(10)?;
        Self::from_variant(digit as u8)
    }

    pub fn variant(self) -> u8 {
        match self {
            AsteroidModel::Jagged => 1,
            AsteroidModel::Lumpy => 2,
            AsteroidModel::Oblong => 3,
        }
    }

    pub fn model_id(self) -> &'static str {
        match self {
            AsteroidModel::Jagged => "asteroid_jagged_1",
            AsteroidModel::Lumpy => "asteroid_lumpy_2",
            AsteroidModel::Oblong => "asteroid_oblong_3",
        }
    }

    /// Bounding sphere radius of the unit-scale mesh.
    pub fn radius_factor(self) -> f64 {
        match self {
            AsteroidModel::Jagged => 1.5,
            AsteroidModel::Lumpy => 1.2,
            AsteroidModel::Oblong => 1.8,
        }
    }
}

/// A rectangular race gate. The opening lies in the gate's local XY plane
/// and is passed along local +Z.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub width: f64,
    pub height: f64,
    pub sequence_index: u32,
}

impl Gate {
    /// World-frame passage direction.
    pub fn normal(&self) -> Vector3<f64> {
        self.orientation * body_forward()
    }

    pub fn to_local(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.orientation.inverse() * (point - self.position)
    }

    /// Signed distance along the passage direction; negative in front of
    /// the gate.
    pub fn signed_distance(&self, point: &Vector3<f64>) -> f64 {
        self.normal().dot(&(point - self.position))
    }

    /// Whether a point already on the gate plane lies inside the opening.
    pub fn opening_contains(&self, local: &Vector3<f64>) -> bool {
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: AsteroidId,
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub scale: f64,
    pub model: AsteroidModel,
    pub bounding_radius: f64,
}

impl Asteroid {
    pub fn new(
        id: AsteroidId,
        position: Vector3<f64>,
        orientation: UnitQuaternion<f64>,
        scale: f64,
        model: AsteroidModel,
    ) -> Self {
        Self {
            id,
            position,
            orientation,
            scale,
            model,
            bounding_radius: scale * model.radius_factor(),
        }
    }

    pub fn with_bounding_radius(mut self, radius: f64) -> Self {
        self.bounding_radius = radius;
        self
    }
}

/// A validated, read-only race course. Gates are held in sequence order.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    name: String,
    boundary: Vector3<f64>,
    gates: Vec<Gate>,
    asteroids: Vec<Asteroid>,
    max_asteroid_radius: f64,
}

impl Course {
    /// Validate and assemble a course. `boundary` holds the full extents of
    /// the course box, centred on the origin.
    pub fn new(
        name: impl Into<String>,
        boundary: Vector3<f64>,
        mut gates: Vec<Gate>,
        asteroids: Vec<Asteroid>,
    ) -> Result<Self, LoadError> {
        if boundary.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(LoadError::InvalidBoundary(format!(
                "extents must be positive, got [{}, {}, {}]",
                boundary.x, boundary.y, boundary.z
            )));
        }

        for (index, gate) in gates.iter().enumerate() {
            validate_gate(index, gate)?;
        }
        for (index, asteroid) in asteroids.iter().enumerate() {
            validate_asteroid(index, asteroid)?;
        }

        gates.sort_by_key(|g| g.sequence_index);
        validate_sequence(&gates)?;

        let mut gate_ids = HashSet::new();
        for gate in &gates {
            if !gate_ids.insert(gate.id) {
                return Err(LoadError::DuplicateGateId(gate.id.0));
            }
        }
        let mut asteroid_ids = HashSet::new();
        for asteroid in &asteroids {
            if !asteroid_ids.insert(asteroid.id) {
                return Err(LoadError::DuplicateAsteroidId(asteroid.id.0));
            }
        }

        let max_asteroid_radius = asteroids
            .iter()
            .map(|a| a.bounding_radius)
            .fold(0.0, f64::max);

        let course = Self {
            name: name.into(),
            boundary,
            gates,
            asteroids,
            max_asteroid_radius,
        };
        course.warn_out_of_bounds();
        Ok(course)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boundary(&self) -> Vector3<f64> {
        self.boundary
    }

    /// Gates in traversal order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    pub fn max_asteroid_radius(&self) -> f64 {
        self.max_asteroid_radius
    }

    pub fn contains(&self, point: &Vector3<f64>) -> bool {
        let half = self.boundary / 2.0;
        point.x.abs() <= half.x && point.y.abs() <= half.y && point.z.abs() <= half.z
    }

    // Placement inside the boundary is the designer's job; the loader only
    // reports stray objects.
    fn warn_out_of_bounds(&self) {
        for gate in self.gates.iter().filter(|g| !self.contains(&g.position)) {
            warn!("Gate {} lies outside the course boundary", gate.id);
        }
        for asteroid in self.asteroids.iter().filter(|a| !self.contains(&a.position)) {
            warn!("Asteroid {} lies outside the course boundary", asteroid.id);
        }
    }
}

fn all_finite(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite())
}

fn validate_gate(index: usize, gate: &Gate) -> Result<(), LoadError> {
    if !all_finite(&gate.position) {
        return Err(LoadError::InvalidGate {
            index,
            reason: "position must be finite".into(),
        });
    }
    if !(gate.width.is_finite() && gate.width > 0.0 && gate.height.is_finite() && gate.height > 0.0)
    {
        return Err(LoadError::InvalidGate {
            index,
            reason: format!(
                "width and height must be positive, got {} x {}",
                gate.width, gate.height
            ),
        });
    }
    Ok(())
}

fn validate_asteroid(index: usize, asteroid: &Asteroid) -> Result<(), LoadError> {
    if !all_finite(&asteroid.position) {
        return Err(LoadError::InvalidAsteroid {
            index,
            reason: "position must be finite".into(),
        });
    }
    if !asteroid.scale.is_finite() || asteroid.scale <= 0.0 {
        return Err(LoadError::InvalidAsteroid {
            index,
            reason: format!("scale must be positive, got {}", asteroid.scale),
        });
    }
    if !asteroid.bounding_radius.is_finite() || asteroid.bounding_radius <= 0.0 {
        return Err(LoadError::InvalidAsteroid {
            index,
            reason: format!(
                "bounding radius must be positive, got {}",
                asteroid.bounding_radius
            ),
        });
    }
    Ok(())
}

/// Gates must already be sorted by sequence index.
fn validate_sequence(gates: &[Gate]) -> Result<(), LoadError> {
    let Some(first) = gates.first() else {
        return Ok(());
    };
    let start = first.sequence_index as i64;
    if start > 1 {
        return Err(LoadError::InvalidSequenceStart(start));
    }
    for (offset, pair) in gates.windows(2).enumerate() {
        let (prev, next) = (pair[0].sequence_index as i64, pair[1].sequence_index as i64);
        if prev == next {
            return Err(LoadError::DuplicateSequenceIndex(next));
        }
        let expected = start + offset as i64 + 1;
        if next != expected {
            return Err(LoadError::SequenceGap {
                expected,
                found: next,
            });
        }
    }
    Ok(())
}
