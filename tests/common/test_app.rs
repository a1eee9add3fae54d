use bevy::prelude::*;
use nalgebra::{UnitQuaternion, Vector3};
use spacerace::{
    components::{CollisionEvent, GatePassageEvent},
    course::Course,
    plugins::RacePlugin,
    SimulationConfig,
};
use std::sync::Arc;

// Builder for creating a test application with customizable configuration
pub struct TestAppBuilder {
    course: Arc<Course>,
    config: SimulationConfig,
    player_start: Option<(Vector3<f64>, UnitQuaternion<f64>)>,
}

impl TestAppBuilder {
    pub fn new(course: Arc<Course>) -> Self {
        Self {
            course,
            config: SimulationConfig::default(),
            player_start: None,
        }
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_player(mut self, position: Vector3<f64>, attitude: UnitQuaternion<f64>) -> Self {
        self.player_start = Some((position, attitude));
        self
    }

    pub fn build(self) -> TestApp {
        let has_player = self.player_start.is_some();
        let mut plugin =
            RacePlugin::new(self.course, self.config).expect("simulation config is valid");
        if let Some((position, attitude)) = self.player_start {
            plugin = plugin.with_player(position, attitude);
        }

        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(plugin);

        // Spawn the player without letting wall-clock time drive FixedUpdate.
        // Startup only exists when a player was requested.
        if has_player {
            app.world_mut().run_schedule(Startup);
        }

        TestApp { app }
    }
}

/// Main test application wrapper
pub struct TestApp {
    pub app: App,
}

impl TestApp {
    /// Run the race pipeline for `steps` fixed ticks.
    pub fn run_steps(&mut self, steps: usize) {
        for _ in 0..steps {
            self.app.world_mut().run_schedule(FixedUpdate);
        }
    }

    pub fn get_state<T: Resource>(&self) -> Option<&T> {
        self.app.world().get_resource::<T>()
    }

    pub fn query_single<T: Component>(&mut self) -> Option<&T> {
        let world = self.app.world_mut();
        let mut query = world.query::<&T>();
        query.get_single(world).ok()
    }

    pub fn query_single_mut<T: Component>(&mut self) -> Option<Mut<T>> {
        let world = self.app.world_mut();
        let mut query = world.query::<&mut T>();
        query.get_single_mut(world).ok()
    }

    pub fn spawn<B: Bundle>(&mut self, bundle: B) -> Entity {
        self.app.world_mut().spawn(bundle).id()
    }

    pub fn gate_events(&self) -> Vec<GatePassageEvent> {
        self.app
            .world()
            .resource::<Events<GatePassageEvent>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }

    pub fn collision_events(&self) -> Vec<CollisionEvent> {
        self.app
            .world()
            .resource::<Events<CollisionEvent>>()
            .iter_current_update_events()
            .cloned()
            .collect()
    }
}
