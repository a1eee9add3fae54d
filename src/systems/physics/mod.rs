mod integrator;

pub use integrator::{integrate_state, integrate_with_limits, physics_integrator_system};
