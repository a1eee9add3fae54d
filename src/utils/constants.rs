pub const MAX_TIMESTEP: f64 = 1.0 / 20.0; // Largest step the integrator will take [s]
pub const DEFAULT_TIMESTEP: f64 = 1.0 / 60.0; // Fixed physics rate for the ECS plugin [s]

pub const NORMALIZE_EPSILON: f64 = 1e-12;
pub const QUATERNION_NORM_TOLERANCE: f64 = 1e-9;

// Spacecraft defaults
pub const SHIP_MASS: f64 = 20000.0; // kg
pub const SHIP_WIDTH: f64 = 15.0; // m
pub const SHIP_HEIGHT: f64 = 15.0; // m
pub const SHIP_LENGTH: f64 = 40.0; // m
pub const SHIP_BOUNDING_RADIUS: f64 = 20.0; // m
pub const MAIN_THRUSTER_MIN_FORCE: f64 = 1000.0; // N
pub const MAIN_THRUSTER_MAX_FORCE: f64 = 3000.0; // N
pub const STEERING_THRUSTER_FORCE: f64 = 200.0; // N
pub const FLIGHT_ASSIST_DAMPING: f64 = 1.5; // 1/s

// Course geometry
pub const DEFAULT_GATE_HALF_SIZE: f64 = 40.0; // m
pub const DESIGNER_GATE_HALF_SIZE: f64 = 800.0; // m
pub const DESIGNER_ASTEROID_SCALE: f64 = 200.0; // m
pub const MIN_ASTEROID_SCALE: f64 = 10.0; // m
pub const MAX_ASTEROID_SCALE: f64 = 60.0; // m, upper bound for generated fields
pub const ASTEROID_SAFE_RADIUS: f64 = 300.0; // m, keep-out sphere around the start

pub const MPS_TO_KMH: f64 = 3.6;
