use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Abstract pilot commands for one tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PilotInput {
    /// Main thruster setting [0, 1]
    pub throttle: f64,
    /// Nose up/down command [-1, 1]
    pub pitch: f64,
    /// Nose left/right command [-1, 1]
    pub yaw: f64,
    /// Roll command [-1, 1]
    pub roll: f64,
}

impl PilotInput {
    pub fn new(throttle: f64, pitch: f64, yaw: f64, roll: f64) -> Self {
        Self {
            throttle,
            pitch,
            yaw,
            roll,
        }
    }

    pub fn throttle(throttle: f64) -> Self {
        Self {
            throttle,
            ..Default::default()
        }
    }

    /// Commands limited to their valid ranges; non-finite commands read as 0.
    pub fn clamped(&self) -> Self {
        let clamp = |v: f64, lo: f64| if v.is_finite() { v.clamp(lo, 1.0) } else { 0.0 };
        Self {
            throttle: clamp(self.throttle, 0.0),
            pitch: clamp(self.pitch, -1.0),
            yaw: clamp(self.yaw, -1.0),
            roll: clamp(self.roll, -1.0),
        }
    }

    pub fn has_rotation_command(&self) -> bool {
        self.pitch != 0.0 || self.yaw != 0.0 || self.roll != 0.0
    }
}
