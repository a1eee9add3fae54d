//! Headless race loop: one spacecraft, one course, stepped by the caller.

use bevy::log::{debug, info, warn};
use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::components::{
    CollisionComponent, CollisionContact, GateEvent, GateEventKind, PilotInput, RaceProgress,
    RaceStatus, RigidBodyState, SpatialComponent,
};
use crate::course::{AsteroidId, AsteroidIndex, Course};
use crate::resources::SimulationConfig;
use crate::systems::{
    advance_race, detect_collisions, integrate_with_limits, map_controls, ControlLimits,
};
use crate::utils::{ConfigError, MPS_TO_KMH};

/// Non-fatal problems with the requested step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StepWarning {
    /// The step was longer than the integrator allows
    TimestepClamped { requested: f64, applied: f64 },
    /// Negative or NaN step, treated as zero
    InvalidTimestep { requested: f64 },
}

/// Flight data for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub position: Vector3<f64>,
    /// [m/s]
    pub speed: f64,
    /// [km/h]
    pub speed_kmh: f64,
    pub forward: Vector3<f64>,
    pub up: Vector3<f64>,
    pub attitude: UnitQuaternion<f64>,
}

impl Telemetry {
    pub fn from_spatial(spatial: &SpatialComponent) -> Self {
        let speed = spatial.speed();
        Self {
            position: spatial.position,
            speed,
            speed_kmh: speed * MPS_TO_KMH,
            forward: spatial.forward(),
            up: spatial.up(),
            attitude: spatial.attitude,
        }
    }
}

/// Outcome of one [`RaceSession::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    pub state: RigidBodyState,
    /// Asteroids touched during the step, by id
    pub collisions: Vec<AsteroidId>,
    pub contacts: Vec<CollisionContact>,
    /// Gate events in the order they happened
    pub gate_events: Vec<GateEvent>,
    pub race_status: RaceStatus,
    pub warnings: Vec<StepWarning>,
    pub telemetry: Telemetry,
}

impl StepResult {
    /// Latest gate event of the step.
    pub fn gate_event(&self) -> Option<&GateEvent> {
        self.gate_events.last()
    }

    pub fn passed_gates(&self) -> impl Iterator<Item = &GateEvent> {
        self.gate_events
            .iter()
            .filter(|e| e.kind == GateEventKind::Passed)
    }

    pub fn has_collision(&self) -> bool {
        !self.collisions.is_empty()
    }
}

/// One pilot's run over a course.
#[derive(Debug)]
pub struct RaceSession {
    id: Uuid,
    course: Arc<Course>,
    index: AsteroidIndex,
    config: SimulationConfig,
    limits: ControlLimits,
    state: RigidBodyState,
    progress: RaceProgress,
    collision: CollisionComponent,
    steps: u64,
}

impl RaceSession {
    /// Validate the configuration and initial state and set up a run at the
    /// first gate.
    pub fn start(
        course: Arc<Course>,
        initial_state: RigidBodyState,
        config: SimulationConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        initial_state.validate()?;

        let index = AsteroidIndex::build(&course);
        let progress = RaceProgress::new(course.gates().len());
        let session = Self {
            id: Uuid::new_v4(),
            limits: config.spacecraft.control_limits(),
            collision: CollisionComponent::new(config.spacecraft.bounding_radius),
            course,
            index,
            config,
            state: initial_state,
            progress,
            steps: 0,
        };
        info!(
            "Session {} started on '{}' ({} gates)",
            session.id,
            session.course.name(),
            session.course.gates().len()
        );
        Ok(session)
    }

    /// Advance the run by `dt` seconds under `input`.
    ///
    /// Controls, integration, collision detection and gate sequencing run in
    /// that order. A zero step changes nothing.
    pub fn step(&mut self, input: &PilotInput, dt: f64) -> StepResult {
        let mut warnings = Vec::new();
        let dt = self.sanitize_timestep(dt, &mut warnings);

        if dt == 0.0 {
            self.collision.register_contacts(&[], self.progress.elapsed);
            return self.result(Vec::new(), Vec::new(), warnings);
        }

        let controls = map_controls(
            input,
            &self.state.spatial.attitude,
            &self.state.spatial.angular_velocity,
            &self.state.physics.inertia,
            &self.limits,
        );
        self.state.physics.net_force = controls.force;
        self.state.physics.net_moment = controls.torque;

        let start = self.state.spatial.position;
        integrate_with_limits(
            &self.state.physics,
            &mut self.state.spatial,
            dt,
            self.config.physics.max_velocity,
            self.config.physics.max_angular_velocity,
        );
        let end = self.state.spatial.position;

        let contacts = detect_collisions(
            &start,
            &end,
            self.config.spacecraft.bounding_radius,
            &self.course,
            &self.index,
        );
        self.collision
            .register_contacts(&contacts, self.progress.elapsed + dt);
        for contact in &contacts {
            debug!(
                "Session {} hit asteroid {} (depth {:.2} m)",
                self.id, contact.asteroid_id, contact.penetration_depth
            );
        }

        let gate_events = advance_race(
            &mut self.progress,
            &self.course,
            &start,
            &end,
            dt,
            &self.config.race,
        );
        for event in &gate_events {
            match event.kind {
                GateEventKind::Passed => info!(
                    "Session {} passed gate {} ({}/{}) at {:.2}s",
                    self.id,
                    event.gate_id,
                    self.progress.passed_gate_ids.len(),
                    self.course.gates().len(),
                    event.race_time
                ),
                GateEventKind::OutOfOrder => debug!(
                    "Session {} crossed gate {} out of order",
                    self.id, event.gate_id
                ),
                GateEventKind::OrderViolation => warn!(
                    "Session {} failed: gate {} crossed out of order",
                    self.id, event.gate_id
                ),
            }
        }

        self.steps += 1;
        self.result(contacts, gate_events, warnings)
    }

    fn sanitize_timestep(&self, dt: f64, warnings: &mut Vec<StepWarning>) -> f64 {
        let max = self.config.physics.max_timestep;
        let warning = if dt.is_nan() || dt < 0.0 {
            Some((StepWarning::InvalidTimestep { requested: dt }, 0.0))
        } else if dt > max {
            Some((
                StepWarning::TimestepClamped {
                    requested: dt,
                    applied: max,
                },
                max,
            ))
        } else {
            None
        };

        match warning {
            Some((warning, applied)) => {
                warn!("Session {}: {:?}", self.id, warning);
                warnings.push(warning);
                applied
            }
            None => dt,
        }
    }

    fn result(
        &self,
        contacts: Vec<CollisionContact>,
        gate_events: Vec<GateEvent>,
        warnings: Vec<StepWarning>,
    ) -> StepResult {
        StepResult {
            state: self.state.clone(),
            collisions: contacts.iter().map(|c| c.asteroid_id).collect(),
            contacts,
            gate_events,
            race_status: self.progress.status,
            warnings,
            telemetry: Telemetry::from_spatial(&self.state.spatial),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn course(&self) -> &Arc<Course> {
        &self.course
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    pub fn race_progress(&self) -> &RaceProgress {
        &self.progress
    }

    /// Collision bookkeeping across the whole run.
    pub fn collision(&self) -> &CollisionComponent {
        &self.collision
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from_spatial(&self.state.spatial)
    }

    /// Steps that advanced the simulation.
    pub fn step_count(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::PhysicsComponent;
    use crate::course::{Asteroid, AsteroidModel, Gate, GateId};
    use crate::resources::GateOrderPolicy;
    use approx::assert_relative_eq;

    fn gate(id: u32, z: f64) -> Gate {
        Gate {
            id: GateId(id),
            position: Vector3::new(0.0, 0.0, z),
            orientation: UnitQuaternion::identity(),
            width: 100.0,
            height: 100.0,
            sequence_index: id,
        }
    }

    fn course(gates: Vec<Gate>, asteroids: Vec<Asteroid>) -> Arc<Course> {
        Arc::new(Course::new("session", Vector3::repeat(1e5), gates, asteroids).unwrap())
    }

    /// Constant 100 N thrust, no damping, steps up to 0.1 s.
    fn test_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.physics.max_timestep = 0.1;
        config.spacecraft.main_thruster_min_force = 100.0;
        config.spacecraft.main_thruster_max_force = 100.0;
        config.spacecraft.flight_assist_damping = 0.0;
        config
    }

    fn small_body() -> RigidBodyState {
        RigidBodyState::at_rest(Vector3::zeros(), UnitQuaternion::identity(), 10.0, 1.0)
    }

    #[test]
    fn test_thrust_step_from_rest() {
        let mut session = RaceSession::start(course(vec![], vec![]), small_body(), test_config())
            .unwrap();
        let result = session.step(&PilotInput::throttle(1.0), 0.1);

        assert_relative_eq!(
            result.state.spatial.velocity,
            Vector3::new(0.0, 0.0, 1.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            result.state.spatial.position,
            Vector3::new(0.0, 0.0, 0.1),
            epsilon = 1e-12
        );
        assert!(result.warnings.is_empty());
        assert_relative_eq!(result.telemetry.speed_kmh, 3.6, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_mass_rejected_at_start() {
        let mut state = small_body();
        state.physics = PhysicsComponent::with_scalar_inertia(0.0, 1.0);
        let result = RaceSession::start(course(vec![], vec![]), state, test_config());
        assert!(matches!(result, Err(ConfigError::NonPositiveMass(_))));
    }

    #[test]
    fn test_zero_step_is_noop() {
        let mut state = small_body();
        state.spatial.velocity = Vector3::new(1.0, 2.0, 3.0);
        let mut session =
            RaceSession::start(course(vec![gate(0, 1.0)], vec![]), state.clone(), test_config())
                .unwrap();

        let result = session.step(&PilotInput::throttle(1.0), 0.0);
        assert_eq!(result.state, state);
        assert!(result.gate_events.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(session.step_count(), 0);
    }

    #[test]
    fn test_long_step_is_clamped() {
        let far_gate = course(vec![gate(0, 1000.0)], vec![]);
        let mut session = RaceSession::start(far_gate, small_body(), test_config()).unwrap();
        let result = session.step(&PilotInput::throttle(1.0), 0.5);
        assert_eq!(
            result.warnings,
            vec![StepWarning::TimestepClamped {
                requested: 0.5,
                applied: 0.1
            }]
        );
        // 10 m/s^2 for 0.1 s
        assert_relative_eq!(result.state.spatial.velocity.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(session.race_progress().elapsed, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_coasting_keeps_high_speed() {
        let mut state = small_body();
        state.spatial.velocity = Vector3::new(0.0, 0.0, 3000.0);
        let mut session = RaceSession::start(course(vec![], vec![]), state, test_config())
            .unwrap();

        let result = session.step(&PilotInput::default(), 0.01);
        assert_eq!(result.state.spatial.velocity, Vector3::new(0.0, 0.0, 3000.0));
        assert_relative_eq!(result.state.spatial.position.z, 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_speed_cap_is_opt_in() {
        let mut config = test_config();
        config.physics.max_velocity = Some(2000.0);
        let mut state = small_body();
        state.spatial.velocity = Vector3::new(0.0, 0.0, 3000.0);
        let mut session = RaceSession::start(course(vec![], vec![]), state, config).unwrap();

        let result = session.step(&PilotInput::default(), 0.01);
        assert_relative_eq!(result.state.spatial.velocity.z, 2000.0, epsilon = 1e-9);
        assert_relative_eq!(result.state.spatial.position.z, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_and_nan_steps() {
        let mut session = RaceSession::start(course(vec![], vec![]), small_body(), test_config())
            .unwrap();
        let result = session.step(&PilotInput::throttle(1.0), -1.0);
        assert!(matches!(
            result.warnings[..],
            [StepWarning::InvalidTimestep { requested }] if requested == -1.0
        ));
        let result = session.step(&PilotInput::throttle(1.0), f64::NAN);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.state.spatial.velocity, Vector3::zeros());
    }

    #[test]
    fn test_full_race_in_order() {
        let gates = vec![gate(0, 50.0), gate(1, 150.0), gate(2, 250.0)];
        let mut state = small_body();
        state.spatial.velocity = Vector3::new(0.0, 0.0, 100.0);
        let mut session = RaceSession::start(course(gates, vec![]), state, test_config()).unwrap();

        let mut passed = Vec::new();
        for _ in 0..200 {
            let result = session.step(&PilotInput::default(), 1.0 / 60.0);
            passed.extend(result.passed_gates().map(|e| e.gate_id));
            if result.race_status == RaceStatus::Completed {
                break;
            }
        }

        assert_eq!(passed, vec![GateId(0), GateId(1), GateId(2)]);
        let progress = session.race_progress();
        assert_eq!(progress.status, RaceStatus::Completed);
        assert_eq!(progress.passed_gate_ids, passed);
        // 250 m at 100 m/s
        assert_relative_eq!(progress.finish_time().unwrap(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_strict_policy_fails_run() {
        let gates = vec![gate(0, 50.0), gate(1, 150.0)];
        let mut config = test_config();
        config.race.order_policy = GateOrderPolicy::Strict;
        // Start past gate 0, heading through gate 1
        let mut state = small_body();
        state.spatial.position = Vector3::new(0.0, 0.0, 100.0);
        state.spatial.velocity = Vector3::new(0.0, 0.0, 1500.0);
        let mut session = RaceSession::start(course(gates, vec![]), state, config).unwrap();

        let result = session.step(&PilotInput::default(), 0.05);
        assert_eq!(result.race_status, RaceStatus::Failed);
        assert_eq!(
            result.gate_event().map(|e| e.kind),
            Some(GateEventKind::OrderViolation)
        );
    }

    #[test]
    fn test_collision_reported() {
        let rock = Asteroid::new(
            AsteroidId(3),
            Vector3::new(0.0, 0.0, 30.0),
            UnitQuaternion::identity(),
            10.0,
            AsteroidModel::Jagged,
        );
        let mut state = small_body();
        state.spatial.velocity = Vector3::new(0.0, 0.0, 100.0);
        let mut session =
            RaceSession::start(course(vec![], vec![rock]), state, test_config()).unwrap();

        let result = session.step(&PilotInput::default(), 0.01);
        assert_eq!(result.collisions, vec![AsteroidId(3)]);
        assert!(result.has_collision());
        assert_eq!(session.collision().collision_count, 1);
        // Collisions do not end the race
        assert_eq!(result.race_status, RaceStatus::Completed);
    }

    #[test]
    fn test_sessions_are_independent() {
        let shared = course(vec![gate(0, 50.0)], vec![]);
        let mut a = RaceSession::start(Arc::clone(&shared), small_body(), test_config()).unwrap();
        let b = RaceSession::start(Arc::clone(&shared), small_body(), test_config()).unwrap();

        a.step(&PilotInput::throttle(1.0), 0.05);
        assert_ne!(a.id(), b.id());
        assert_eq!(b.state(), &small_body());
        assert_eq!(b.race_progress().elapsed, 0.0);
    }
}
