mod crossing;
mod sequencer;

pub use crossing::{segment_crossing, CrossingDirection, GateCrossing};
pub use sequencer::{advance_race, gate_sequencer_system};
