use bevy::log::{debug, info};
use nalgebra::{UnitQuaternion, Vector3};
use std::path::Path;

use super::model::{Asteroid, AsteroidId, AsteroidModel, Course, Gate, GateId};
use super::schema::{AsteroidDocument, BoundarySpec, CourseDocument, GateDocument, ModelSpec};
use crate::utils::{
    orientation_from_wxyz, orientation_from_yaw_pitch_roll, orientation_to_wxyz, LoadError,
};

pub const COURSE_SCHEMA_VERSION: u32 = 1;

/// Parse and validate a serialized course.
pub fn load_course(serialized: &str) -> Result<Course, LoadError> {
    let document: CourseDocument = serde_json::from_str(serialized)?;
    let course = Course::try_from(document)?;
    info!(
        "Loaded course '{}' with {} gates and {} asteroids",
        course.name(),
        course.gates().len(),
        course.asteroids().len()
    );
    Ok(course)
}

pub fn load_course_file(path: impl AsRef<Path>) -> Result<Course, LoadError> {
    let path = path.as_ref();
    debug!("Reading course from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    load_course(&contents)
}

/// Serialize a course in the shared schema.
pub fn save_course(course: &Course) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&CourseDocument::from(course))
}

pub fn save_course_file(course: &Course, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let contents = save_course(course)?;
    std::fs::write(path, contents)?;
    info!("Course '{}' saved to {}", course.name(), path.display());
    Ok(())
}

impl TryFrom<CourseDocument> for Course {
    type Error = LoadError;

    fn try_from(document: CourseDocument) -> Result<Self, Self::Error> {
        let boundary = match document.boundary_size {
            BoundarySpec::Cube(size) => Vector3::new(size, size, size),
            BoundarySpec::Box {
                width,
                height,
                depth,
            } => Vector3::new(width, height, depth),
        };

        let gates = document
            .gates
            .iter()
            .enumerate()
            .map(|(index, gate)| gate_from_document(index, gate))
            .collect::<Result<Vec<_>, _>>()?;

        let asteroids = document
            .asteroids
            .iter()
            .enumerate()
            .map(|(index, asteroid)| asteroid_from_document(index, asteroid))
            .collect::<Result<Vec<_>, _>>()?;

        Course::new(
            document.name.unwrap_or_else(|| "Untitled Course".to_string()),
            boundary,
            gates,
            asteroids,
        )
    }
}

impl From<&Course> for CourseDocument {
    fn from(course: &Course) -> Self {
        let boundary = course.boundary();
        let boundary_size = if boundary.x == boundary.y && boundary.y == boundary.z {
            BoundarySpec::Cube(boundary.x)
        } else {
            BoundarySpec::Box {
                width: boundary.x,
                height: boundary.y,
                depth: boundary.z,
            }
        };

        Self {
            version: Some(COURSE_SCHEMA_VERSION),
            name: Some(course.name().to_string()),
            boundary_size,
            gates: course
                .gates()
                .iter()
                .map(|gate| GateDocument {
                    id: Some(gate.id.0),
                    position: gate.position.into(),
                    orientation: orientation_to_wxyz(&gate.orientation).to_vec(),
                    width: Some(gate.width),
                    height: Some(gate.height),
                    size: None,
                    sequence_index: gate.sequence_index as i64,
                })
                .collect(),
            asteroids: course
                .asteroids()
                .iter()
                .map(|asteroid| AsteroidDocument {
                    id: Some(asteroid.id.0),
                    position: asteroid.position.into(),
                    orientation: orientation_to_wxyz(&asteroid.orientation).to_vec(),
                    scale: asteroid.scale,
                    model_variant: ModelSpec::Variant(asteroid.model.variant()),
                    bounding_radius: Some(asteroid.bounding_radius),
                })
                .collect(),
        }
    }
}

fn parse_orientation(values: &[f64]) -> Result<UnitQuaternion<f64>, String> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err("orientation must be finite".into());
    }
    match *values {
        [yaw, pitch, roll] => Ok(orientation_from_yaw_pitch_roll(yaw, pitch, roll)),
        [w, x, y, z] => {
            orientation_from_wxyz(w, x, y, z)
                .ok_or_else(|| "orientation quaternion is zero".to_string())
        }
        _ => Err(format!(
            "orientation needs 3 angles or 4 quaternion components, got {} values",
            values.len()
        )),
    }
}

fn gate_from_document(index: usize, doc: &GateDocument) -> Result<Gate, LoadError> {
    let invalid = |reason: String| LoadError::InvalidGate { index, reason };

    let sequence_index = u32::try_from(doc.sequence_index)
        .map_err(|_| invalid(format!("sequence index {} is negative", doc.sequence_index)))?;
    let orientation = parse_orientation(&doc.orientation).map_err(invalid)?;

    let (width, height) = match (doc.width, doc.height, doc.size) {
        (Some(width), Some(height), _) => (width, height),
        (None, None, Some(size)) => (2.0 * size, 2.0 * size),
        _ => return Err(invalid("missing width/height (or size)".into())),
    };

    Ok(Gate {
        id: GateId(doc.id.unwrap_or(sequence_index)),
        position: Vector3::from(doc.position),
        orientation,
        width,
        height,
        sequence_index,
    })
}

fn asteroid_from_document(index: usize, doc: &AsteroidDocument) -> Result<Asteroid, LoadError> {
    let invalid = |reason: String| LoadError::InvalidAsteroid { index, reason };

    let model = match &doc.model_variant {
        ModelSpec::Variant(variant) => AsteroidModel::from_variant(*variant),
        ModelSpec::Name(name) => AsteroidModel::from_model_id(name),
    }
    .ok_or_else(|| invalid(format!("unknown model variant {:?}", doc.model_variant)))?;
    let orientation = parse_orientation(&doc.orientation).map_err(invalid)?;

    let asteroid = Asteroid::new(
        AsteroidId(doc.id.unwrap_or(index as u32)),
        Vector3::from(doc.position),
        orientation,
        doc.scale,
        model,
    );
    Ok(match doc.bounding_radius {
        Some(radius) => asteroid.with_bounding_radius(radius),
        None => asteroid,
    })
}
