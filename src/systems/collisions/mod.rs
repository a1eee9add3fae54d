mod detection;

pub use detection::{collision_detection_system, detect_collisions};
