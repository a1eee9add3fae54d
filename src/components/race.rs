use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::course::GateId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceStatus {
    InProgress,
    Completed,
    Failed,
}

impl RaceStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RaceStatus::InProgress)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateEventKind {
    /// The expected gate was passed
    Passed,
    /// A later gate was crossed and ignored
    OutOfOrder,
    /// A later gate was crossed under the strict ordering policy
    OrderViolation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateEvent {
    pub gate_id: GateId,
    pub sequence_index: u32,
    pub kind: GateEventKind,
    /// Race time at the crossing [s]
    pub race_time: f64,
    /// Position of the crossing along this tick's path [0, 1]
    pub fraction: f64,
}

#[derive(Event, Debug, Clone)]
pub struct GatePassageEvent {
    pub entity: Entity,
    pub event: GateEvent,
    pub status: RaceStatus,
}

/// Progress of one spacecraft through the course gates.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceProgress {
    pub next_gate_index: usize,
    pub passed_gate_ids: Vec<GateId>,
    /// Race time at which each passed gate was crossed [s]
    pub split_times: Vec<f64>,
    /// Race time elapsed so far [s]
    pub elapsed: f64,
    pub status: RaceStatus,
}

impl RaceProgress {
    /// Fresh progress for a course with `gate_count` gates. A course without
    /// gates is complete from the start.
    pub fn new(gate_count: usize) -> Self {
        Self {
            next_gate_index: 0,
            passed_gate_ids: Vec::with_capacity(gate_count),
            split_times: Vec::with_capacity(gate_count),
            elapsed: 0.0,
            status: if gate_count == 0 {
                RaceStatus::Completed
            } else {
                RaceStatus::InProgress
            },
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Finish time, once every gate has been passed.
    pub fn finish_time(&self) -> Option<f64> {
        match self.status {
            RaceStatus::Completed => self.split_times.last().copied().or(Some(0.0)),
            _ => None,
        }
    }
}
