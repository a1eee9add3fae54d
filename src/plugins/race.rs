use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use std::sync::Arc;

use crate::components::{
    CollisionComponent, CollisionEvent, GatePassageEvent, PhysicsComponent, PilotInput,
    PreviousPosition, RaceProgress, SpatialComponent,
};
use crate::course::Course;
use crate::resources::{CourseResource, SimulationConfig, SpacecraftConfig};
use crate::utils::ConfigError;
use crate::systems::{
    collision_detection_system, control_mapper_system, gate_sequencer_system,
    physics_integrator_system, ControlLimits,
};

/// Race simulation stages, run in order every fixed tick
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum RaceSet {
    Controls,
    Integration,
    Collisions,
    Gates,
}

/// Everything a racing spacecraft entity carries.
#[derive(Bundle)]
pub struct SpacecraftBundle {
    pub name: Name,
    pub input: PilotInput,
    pub limits: ControlLimits,
    pub spatial: SpatialComponent,
    pub previous: PreviousPosition,
    pub physics: PhysicsComponent,
    pub collision: CollisionComponent,
    pub progress: RaceProgress,
}

impl SpacecraftBundle {
    /// Ship at rest at the given pose, at the start of `course`.
    pub fn new(
        config: &SpacecraftConfig,
        course: &Course,
        position: Vector3<f64>,
        attitude: UnitQuaternion<f64>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = config.rigid_body(position, attitude);
        state.validate()?;
        Ok(Self {
            name: Name::new(config.name.clone()),
            input: PilotInput::default(),
            limits: config.control_limits(),
            spatial: state.spatial,
            previous: PreviousPosition(position),
            physics: state.physics,
            collision: CollisionComponent::new(config.bounding_radius),
            progress: RaceProgress::new(course.gates().len()),
        })
    }
}

/// Runs the flight model, asteroid collisions and gate sequencing for every
/// spacecraft entity on a shared course.
pub struct RacePlugin {
    course: Arc<Course>,
    config: SimulationConfig,
    /// Spawn one ship at this pose during startup
    player_start: Option<(Vector3<f64>, UnitQuaternion<f64>)>,
}

impl RacePlugin {
    /// Fails on an invalid configuration; nothing is registered for it.
    pub fn new(course: Arc<Course>, config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            course,
            config,
            player_start: None,
        })
    }

    pub fn with_player(mut self, position: Vector3<f64>, attitude: UnitQuaternion<f64>) -> Self {
        self.player_start = Some((position, attitude));
        self
    }

    fn setup_player(
        mut commands: Commands,
        spacecraft: Res<SpacecraftConfig>,
        course: Res<CourseResource>,
        start: (Vector3<f64>, UnitQuaternion<f64>),
    ) {
        let (position, attitude) = start;
        match SpacecraftBundle::new(&spacecraft, &course.course, position, attitude) {
            Ok(bundle) => {
                info!("Spawning {} at {:?}", spacecraft.name, position);
                commands.spawn(bundle);
            }
            Err(e) => error!("Cannot spawn {}: {}", spacecraft.name, e),
        }
    }
}

impl Plugin for RacePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.physics.clone())
            .insert_resource(self.config.spacecraft.clone())
            .insert_resource(self.config.race.clone())
            .insert_resource(CourseResource::new(Arc::clone(&self.course)))
            .insert_resource(Time::<Fixed>::from_seconds(self.config.physics.timestep));

        app.add_event::<CollisionEvent>()
            .add_event::<GatePassageEvent>();

        // Controls -> Integration -> Collisions -> Gates
        app.configure_sets(
            FixedUpdate,
            (
                RaceSet::Controls,
                RaceSet::Integration,
                RaceSet::Collisions,
                RaceSet::Gates,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                control_mapper_system.in_set(RaceSet::Controls),
                physics_integrator_system.in_set(RaceSet::Integration),
                collision_detection_system.in_set(RaceSet::Collisions),
                gate_sequencer_system.in_set(RaceSet::Gates),
            ),
        );

        if let Some(start) = self.player_start {
            app.add_systems(
                Startup,
                move |commands: Commands,
                      spacecraft: Res<SpacecraftConfig>,
                      course: Res<CourseResource>| {
                    Self::setup_player(commands, spacecraft, course, start)
                },
            );
        }

        info!(
            "Race plugin ready on '{}' ({} gates, {} asteroids)",
            self.course.name(),
            self.course.gates().len(),
            self.course.asteroids().len()
        );
    }
}
