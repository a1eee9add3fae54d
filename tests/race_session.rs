mod common;

use approx::assert_relative_eq;
use common::{assert_spatial_valid, coasting_config, rock, sprint_course, straight_course};
use nalgebra::{UnitQuaternion, Vector3};
use pretty_assertions::assert_eq;
use spacerace::{
    course::{AsteroidId, GateId},
    GateEventKind, GateOrderPolicy, PilotInput, RaceSession, RaceStatus, SimulationConfig,
    StepResult,
};

const DT: f64 = 1.0 / 60.0;

fn start_session(
    config: SimulationConfig,
    position: Vector3<f64>,
    velocity: Vector3<f64>,
) -> RaceSession {
    let mut state = config
        .spacecraft
        .rigid_body(position, UnitQuaternion::identity());
    state.spatial.velocity = velocity;
    RaceSession::start(sprint_course(), state, config).unwrap()
}

fn fly(session: &mut RaceSession, input: PilotInput, steps: usize) -> Vec<StepResult> {
    (0..steps).map(|_| session.step(&input, DT)).collect()
}

#[test]
fn test_sprint_course_completed_in_order() {
    let mut session = start_session(
        SimulationConfig::default(),
        Vector3::zeros(),
        Vector3::new(0.0, 0.0, 200.0),
    );

    let results = fly(&mut session, PilotInput::throttle(0.5), 360);
    let passed: Vec<GateId> = results
        .iter()
        .flat_map(|r| r.passed_gates().map(|e| e.gate_id))
        .collect();

    assert_eq!(passed, vec![GateId(1), GateId(2), GateId(3)]);
    assert!(results.iter().all(|r| r.collisions.is_empty()));

    let progress = session.race_progress();
    assert_eq!(progress.status, RaceStatus::Completed);
    assert_eq!(progress.passed_gate_ids, passed);
    assert!(progress.finish_time().unwrap() < 5.0);

    let last = results.last().unwrap();
    assert_eq!(last.race_status, RaceStatus::Completed);
    assert!(last.telemetry.speed > 200.0);
    assert_spatial_valid(&last.state.spatial);
}

#[test]
fn test_flying_into_asteroid_reports_collisions() {
    let mut session = start_session(
        coasting_config(),
        Vector3::new(300.0, 0.0, 0.0),
        Vector3::new(0.0, 0.0, 200.0),
    );

    let results = fly(&mut session, PilotInput::default(), 180);
    let hit_steps = results.iter().filter(|r| r.has_collision()).count();

    assert!(hit_steps > 1);
    assert!(results
        .iter()
        .flat_map(|r| r.collisions.iter())
        .all(|id| *id == AsteroidId(9)));
    // Alongside the gates, never through them
    assert_eq!(session.race_progress().status, RaceStatus::InProgress);
    assert!(session.race_progress().passed_gate_ids.is_empty());
    // One pass through the rock is one collision however many ticks it lasts
    assert_eq!(session.collision().collision_count, 1);
}

#[test]
fn test_skipping_a_gate_depends_on_policy() {
    // Start between gates 1 and 2
    let start = Vector3::new(0.0, 0.0, 400.0);
    let velocity = Vector3::new(0.0, 0.0, 200.0);

    let mut lenient = start_session(coasting_config(), start, velocity);
    let results = fly(&mut lenient, PilotInput::default(), 200);
    let kinds: Vec<GateEventKind> = results
        .iter()
        .flat_map(|r| r.gate_events.iter().map(|e| e.kind))
        .collect();
    assert_eq!(kinds, vec![GateEventKind::OutOfOrder, GateEventKind::OutOfOrder]);
    assert_eq!(lenient.race_progress().status, RaceStatus::InProgress);
    assert_eq!(lenient.race_progress().next_gate_index, 0);

    let mut config = coasting_config();
    config.race.order_policy = GateOrderPolicy::Strict;
    let mut strict = start_session(config, start, velocity);
    let results = fly(&mut strict, PilotInput::default(), 200);
    let failure = results
        .iter()
        .find_map(|r| r.gate_event().filter(|e| e.kind == GateEventKind::OrderViolation))
        .expect("strict run fails at gate 2");
    assert_eq!(failure.gate_id, GateId(2));
    assert_eq!(strict.race_progress().status, RaceStatus::Failed);
    // Failure is terminal: gate 3 produced nothing
    assert_eq!(results.iter().map(|r| r.gate_events.len()).sum::<usize>(), 1);
}

#[test]
fn test_flight_assist_damps_spin() {
    let session = start_session(SimulationConfig::default(), Vector3::zeros(), Vector3::zeros());
    let mut state = session.state().clone();
    state.spatial.angular_velocity = Vector3::new(0.0, 1.0, 0.0);
    let mut session = RaceSession::start(
        session.course().clone(),
        state,
        session.config().clone(),
    )
    .unwrap();

    let results = fly(&mut session, PilotInput::default(), 120);
    let spin = results.last().unwrap().state.spatial.angular_velocity.norm();
    // (1 - 1.5 / 60)^120 ~ 0.048
    assert!(spin > 0.03 && spin < 0.06, "spin {}", spin);
}

#[test]
fn test_yaw_turns_nose_right() {
    let mut session = start_session(coasting_config(), Vector3::zeros(), Vector3::zeros());
    let results = fly(&mut session, PilotInput::new(0.0, 0.0, 1.0, 0.0), 120);
    let telemetry = &results.last().unwrap().telemetry;
    assert!(telemetry.forward.x > 0.0);
    assert_relative_eq!(telemetry.forward.norm(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(telemetry.up, Vector3::y(), epsilon = 1e-9);
}

#[test]
fn test_identical_inputs_give_identical_runs() {
    let inputs = [
        PilotInput::new(1.0, 0.2, 0.0, 0.0),
        PilotInput::new(0.6, 0.0, -0.4, 0.1),
        PilotInput::default(),
    ];
    let run = || {
        let mut session = start_session(
            SimulationConfig::default(),
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 50.0),
        );
        inputs
            .iter()
            .cycle()
            .take(300)
            .map(|input| session.step(input, DT).state)
            .last()
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_quaternion_norm_over_long_tumble() {
    let course = straight_course(1, 1e4, vec![rock(0, Vector3::new(5000.0, 0.0, 0.0), 10.0)]);
    let config = SimulationConfig::default();
    let state = config
        .spacecraft
        .rigid_body(Vector3::zeros(), UnitQuaternion::identity());
    let mut session = RaceSession::start(course, state, config).unwrap();

    for i in 0..5000 {
        let phase = i as f64 * 0.01;
        let input = PilotInput::new(0.3, phase.sin(), phase.cos(), (2.0 * phase).sin());
        let result = session.step(&input, DT);
        assert_spatial_valid(&result.state.spatial);
    }
}
