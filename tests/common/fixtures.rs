use nalgebra::{UnitQuaternion, Vector3};
use spacerace::{
    course::{load_course, Asteroid, AsteroidId, AsteroidModel, Course, Gate, GateId},
    SimulationConfig,
};
use std::sync::Arc;

/// Three gates along +Z with a rock beside the line, in the shared JSON
/// schema.
pub const SPRINT_COURSE: &str = r#"{
    "name": "Sprint",
    "boundarySize": 20000,
    "gates": [
        { "id": 1, "position": [0, 0, 200], "orientation": [0, 0, 0],
          "width": 80, "height": 80, "sequenceIndex": 0 },
        { "id": 2, "position": [0, 0, 600], "orientation": [1, 0, 0, 0],
          "width": 80, "height": 80, "sequenceIndex": 1 },
        { "id": 3, "position": [0, 0, 1000], "orientation": [0, 0, 0],
          "width": 80, "height": 80, "sequenceIndex": 2 }
    ],
    "asteroids": [
        { "id": 9, "position": [300, 0, 400], "orientation": [0, 0, 0],
          "scale": 40, "modelVariant": 1 }
    ]
}"#;

pub fn sprint_course() -> Arc<Course> {
    Arc::new(load_course(SPRINT_COURSE).expect("sprint course is valid"))
}

/// Straight line of gates every `spacing` metres along +Z.
pub fn straight_course(count: u32, spacing: f64, asteroids: Vec<Asteroid>) -> Arc<Course> {
    let gates = (0..count)
        .map(|i| Gate {
            id: GateId(i),
            position: Vector3::new(0.0, 0.0, spacing * (i + 1) as f64),
            orientation: UnitQuaternion::identity(),
            width: 80.0,
            height: 80.0,
            sequence_index: i,
        })
        .collect();
    Arc::new(
        Course::new("straight", Vector3::repeat(1e5), gates, asteroids)
            .expect("straight course is valid"),
    )
}

pub fn rock(id: u32, position: Vector3<f64>, scale: f64) -> Asteroid {
    Asteroid::new(
        AsteroidId(id),
        position,
        UnitQuaternion::identity(),
        scale,
        AsteroidModel::Lumpy,
    )
}

/// Default ship with flight assist off so coasting is exact.
pub fn coasting_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.spacecraft.flight_assist_damping = 0.0;
    config
}
