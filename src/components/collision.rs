use bevy::prelude::*;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::course::AsteroidId;

/// One asteroid overlapping the spacecraft's swept bounding sphere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionContact {
    pub asteroid_id: AsteroidId,
    /// Point on the asteroid's bounding sphere closest to the spacecraft path
    pub impact_point: Vector3<f64>,
    /// Surface normal at the impact point, pointing away from the asteroid
    pub normal: Vector3<f64>,
    /// Overlap of the two bounding spheres at closest approach [m]
    pub penetration_depth: f64,
}

#[derive(Event, Debug, Clone)]
pub struct CollisionEvent {
    /// Entity that collided
    pub entity: Entity,
    pub contact: CollisionContact,
}

#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct CollisionComponent {
    /// Bounding sphere radius [m]
    pub radius: f64,
    /// Whether entity has collided this tick
    #[serde(skip)]
    pub has_collided: bool,
    /// Distinct collisions so far; a sustained overlap counts once
    #[serde(skip)]
    pub collision_count: u32,
    /// Race time of last collision
    #[serde(skip)]
    pub last_collision_time: f64,
    /// Asteroids touched during the last tick
    #[serde(skip)]
    pub contacts: Vec<AsteroidId>,
}

impl CollisionComponent {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            has_collided: false,
            collision_count: 0,
            last_collision_time: 0.0,
            contacts: Vec::new(),
        }
    }

    /// Record the outcome of one tick's detection pass. An asteroid still
    /// touched from the previous tick is the same collision, not a new one.
    pub fn register_contacts(&mut self, contacts: &[CollisionContact], time: f64) {
        let current: Vec<AsteroidId> = contacts.iter().map(|c| c.asteroid_id).collect();
        let new_contacts = current
            .iter()
            .filter(|id| !self.contacts.contains(id))
            .count();
        if new_contacts > 0 {
            self.collision_count += new_contacts as u32;
            self.last_collision_time = time;
        }
        self.has_collided = !current.is_empty();
        self.contacts = current;
    }
}
