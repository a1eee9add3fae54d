pub mod collisions;
pub mod controller;
pub mod gates;
pub mod physics;

pub use collisions::{collision_detection_system, detect_collisions};
pub use controller::{control_mapper_system, map_controls, ControlForces, ControlLimits};
pub use gates::{advance_race, gate_sequencer_system, segment_crossing};
pub use physics::{integrate_state, integrate_with_limits, physics_integrator_system};
