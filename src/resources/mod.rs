pub mod config;
mod course;

pub use config::{
    GateOrderPolicy, PhysicsConfig, RaceConfig, SimulationConfig, SpacecraftConfig,
};
pub use course::CourseResource;
