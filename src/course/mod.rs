pub mod generator;
pub mod loader;
pub mod model;
pub mod schema;
pub mod spatial_index;

pub use generator::{
    default_gate_course, generate_asteroid_field, generate_course, CourseGeneratorConfig,
};
pub use loader::{load_course, load_course_file, save_course, save_course_file};
pub use model::{Asteroid, AsteroidId, AsteroidModel, Course, Gate, GateId};
pub use schema::CourseDocument;
pub use spatial_index::AsteroidIndex;
