pub mod physics;
pub mod race;
pub mod simulation;
pub mod spacecraft;

pub use physics::PhysicsConfig;
pub use race::{GateOrderPolicy, RaceConfig};
pub use simulation::SimulationConfig;
pub use spacecraft::SpacecraftConfig;
