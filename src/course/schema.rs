//! Serialized course description shared by the game and the course designer.
//!
//! Field names are camelCase; the snake_case names written by older designer
//! builds are accepted as aliases.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default, alias = "course_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(alias = "boundaries", alias = "boundary_size")]
    pub boundary_size: BoundarySpec,

    #[serde(alias = "race_gates")]
    pub gates: Vec<GateDocument>,

    #[serde(default)]
    pub asteroids: Vec<AsteroidDocument>,
}

/// A cube edge length or explicit box extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundarySpec {
    Cube(f64),
    Box { width: f64, height: f64, depth: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    pub position: [f64; 3],

    /// `[yaw, pitch, roll]` in radians or a `[w, x, y, z]` quaternion.
    pub orientation: Vec<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// Half-extent of a square opening, as written by the designer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(alias = "gate_number", alias = "sequence_index")]
    pub sequence_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsteroidDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,

    pub position: [f64; 3],

    pub orientation: Vec<f64>,

    #[serde(alias = "size")]
    pub scale: f64,

    #[serde(alias = "model_variant", alias = "model_id")]
    pub model_variant: ModelSpec,

    #[serde(
        default,
        alias = "bounding_radius",
        skip_serializing_if = "Option::is_none"
    )]
    pub bounding_radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelSpec {
    Variant(u8),
    Name(String),
}
