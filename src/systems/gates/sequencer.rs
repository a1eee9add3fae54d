use bevy::prelude::*;
use nalgebra::Vector3;

use super::crossing::segment_crossing;
use crate::components::{
    GateEvent, GateEventKind, GatePassageEvent, PreviousPosition, RaceProgress, RaceStatus,
    SpatialComponent,
};
use crate::course::Course;
use crate::resources::{CourseResource, GateOrderPolicy, PhysicsConfig, RaceConfig};

/// Advance `progress` along the path flown during one step.
///
/// `dt` is the step length, used to time-stamp crossings within the step.
/// Gates are evaluated in the order the path reaches them, so a long step
/// may pass several. Completed and failed races are left untouched.
pub fn advance_race(
    progress: &mut RaceProgress,
    course: &Course,
    start: &Vector3<f64>,
    end: &Vector3<f64>,
    dt: f64,
    config: &RaceConfig,
) -> Vec<GateEvent> {
    if progress.is_finished() {
        return Vec::new();
    }
    let step_start = progress.elapsed;
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

    // Only gates not yet passed can produce an event
    let mut crossings: Vec<(usize, f64)> = course
        .gates()
        .iter()
        .enumerate()
        .skip(progress.next_gate_index)
        .filter_map(|(i, gate)| {
            segment_crossing(gate, start, end, config.allow_reverse_passage)
                .map(|crossing| (i, crossing.fraction))
        })
        .collect();
    crossings.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut events = Vec::new();
    for (gate_index, fraction) in crossings {
        if progress.is_finished() {
            break;
        }
        // Skips gates that became passed earlier in this step
        if gate_index < progress.next_gate_index {
            continue;
        }
        let gate = &course.gates()[gate_index];
        let race_time = step_start + fraction * dt;

        let kind = if gate_index == progress.next_gate_index {
            progress.passed_gate_ids.push(gate.id);
            progress.split_times.push(race_time);
            progress.next_gate_index += 1;
            if progress.next_gate_index == course.gates().len() {
                progress.status = RaceStatus::Completed;
                progress.elapsed = race_time;
            }
            GateEventKind::Passed
        } else {
            match config.order_policy {
                GateOrderPolicy::Lenient => GateEventKind::OutOfOrder,
                GateOrderPolicy::Strict => {
                    progress.status = RaceStatus::Failed;
                    progress.elapsed = race_time;
                    GateEventKind::OrderViolation
                }
            }
        };

        events.push(GateEvent {
            gate_id: gate.id,
            sequence_index: gate.sequence_index,
            kind,
            race_time,
            fraction,
        });
    }

    if !progress.is_finished() {
        progress.elapsed = step_start + dt;
    }
    events
}

pub fn gate_sequencer_system(
    mut query: Query<(
        Entity,
        &SpatialComponent,
        &PreviousPosition,
        &mut RaceProgress,
    )>,
    course: Option<Res<CourseResource>>,
    race: Res<RaceConfig>,
    physics: Res<PhysicsConfig>,
    mut gate_events: EventWriter<GatePassageEvent>,
) {
    let Some(course) = course else {
        return;
    };
    let dt = physics.timestep.min(physics.max_timestep);

    for (entity, spatial, previous, mut progress) in query.iter_mut() {
        let events = advance_race(
            &mut progress,
            &course.course,
            &previous.0,
            &spatial.position,
            dt,
            &race,
        );
        for event in events {
            match event.kind {
                GateEventKind::Passed => info!(
                    "Entity {:?} passed gate {} at {:.2}s",
                    entity, event.gate_id, event.race_time
                ),
                _ => warn!(
                    "Entity {:?} crossed gate {} out of order",
                    entity, event.gate_id
                ),
            }
            gate_events.send(GatePassageEvent {
                entity,
                event,
                status: progress.status,
            });
        }
    }
}
