mod thrust;

pub use thrust::{
    control_mapper_system, main_thrust, map_controls, ControlForces, ControlLimits,
};
