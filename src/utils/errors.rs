use std::io;
use thiserror::Error;

/// Course data that cannot be turned into a [`Course`](crate::course::Course).
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed course data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid boundary size: {0}")]
    InvalidBoundary(String),

    #[error("Duplicate gate sequence index {0}")]
    DuplicateSequenceIndex(i64),

    #[error("Gate sequence indices must start at 0 or 1, found {0}")]
    InvalidSequenceStart(i64),

    #[error("Gap in gate sequence: expected index {expected}, found {found}")]
    SequenceGap { expected: i64, found: i64 },

    #[error("Duplicate gate id {0}")]
    DuplicateGateId(u32),

    #[error("Duplicate asteroid id {0}")]
    DuplicateAsteroidId(u32),

    #[error("Gate {index}: {reason}")]
    InvalidGate { index: usize, reason: String },

    #[error("Asteroid {index}: {reason}")]
    InvalidAsteroid { index: usize, reason: String },
}

/// Invalid spacecraft or physics parameters, reported when a session starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("Inertia tensor must be positive definite")]
    InvalidInertia,

    #[error("Invalid parameter '{name}' with value '{value}'")]
    InvalidParameter { name: String, value: String },
}

impl ConfigError {
    pub fn invalid(name: &str, value: impl ToString) -> Self {
        ConfigError::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// A course editor operation that refers to something that is not there.
#[derive(Error, Debug, PartialEq)]
pub enum EditError {
    #[error("No gate at index {0}")]
    NoSuchGate(usize),

    #[error("No asteroid at index {0}")]
    NoSuchAsteroid(usize),

    #[error("Rotation axis must be non-zero")]
    ZeroAxis,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Course error: {0}")]
    Load(#[from] LoadError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
