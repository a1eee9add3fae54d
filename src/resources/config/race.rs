use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// What happens when a pilot flies through a gate ahead of the expected one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateOrderPolicy {
    /// Ignore the crossing and keep racing
    #[default]
    Lenient,
    /// Disqualify the run
    Strict,
}

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub order_policy: GateOrderPolicy,
    /// Also count gates flown through against their passage direction
    pub allow_reverse_passage: bool,
}
