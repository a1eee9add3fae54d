//! Headless course editing: the operations behind the designer tool.
//!
//! The editor keeps a loose, mutable copy of a course. Gates are kept in
//! race order and renumbered when the course is built, so callers never
//! manage sequence indices themselves.

use bevy::log::info;
use nalgebra::{Unit, UnitQuaternion, Vector3};
use std::path::Path;

use crate::course::{
    load_course_file, save_course_file, Asteroid, AsteroidId, AsteroidModel, Course, Gate, GateId,
};
use crate::utils::{
    renormalize, EditError, LoadError, DESIGNER_ASTEROID_SCALE, DESIGNER_GATE_HALF_SIZE,
    MIN_ASTEROID_SCALE, NORMALIZE_EPSILON,
};

const DEFAULT_BOUNDARY: f64 = 20000.0;

/// Selection handle for an object in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectRef {
    Gate(usize),
    Asteroid(usize),
}

#[derive(Debug, Clone)]
pub struct CourseEditor {
    name: String,
    boundary: Vector3<f64>,
    gates: Vec<Gate>,
    asteroids: Vec<Asteroid>,
    /// `None` once ids past `u32::MAX` would be needed
    next_gate_id: Option<u32>,
    next_asteroid_id: Option<u32>,
}

impl CourseEditor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boundary: Vector3::repeat(DEFAULT_BOUNDARY),
            gates: Vec::new(),
            asteroids: Vec::new(),
            next_gate_id: Some(0),
            next_asteroid_id: Some(0),
        }
    }

    pub fn from_course(course: &Course) -> Self {
        let after = |max: Option<u32>| max.map_or(Some(0), |id| id.checked_add(1));
        let next_gate_id = after(course.gates().iter().map(|g| g.id.0).max());
        let next_asteroid_id = after(course.asteroids().iter().map(|a| a.id.0).max());
        Self {
            name: course.name().to_string(),
            boundary: course.boundary(),
            gates: course.gates().to_vec(),
            asteroids: course.asteroids().to_vec(),
            next_gate_id,
            next_asteroid_id,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Ok(Self::from_course(&load_course_file(path)?))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        save_course_file(&self.to_course()?, path)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn boundary(&self) -> Vector3<f64> {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: Vector3<f64>) {
        self.boundary = boundary;
    }

    /// Gates in race order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    /// Append a square gate facing +Z as the last gate of the race.
    pub fn add_gate(&mut self, position: Vector3<f64>) -> usize {
        let used: Vec<u32> = self.gates.iter().map(|g| g.id.0).collect();
        let id = GateId(allocate_id(&mut self.next_gate_id, used));
        self.gates.push(Gate {
            id,
            position,
            orientation: UnitQuaternion::identity(),
            width: 2.0 * DESIGNER_GATE_HALF_SIZE,
            height: 2.0 * DESIGNER_GATE_HALF_SIZE,
            sequence_index: self.gates.len() as u32,
        });
        self.gates.len() - 1
    }

    pub fn add_asteroid(&mut self, position: Vector3<f64>) -> usize {
        let used: Vec<u32> = self.asteroids.iter().map(|a| a.id.0).collect();
        let id = AsteroidId(allocate_id(&mut self.next_asteroid_id, used));
        self.asteroids.push(Asteroid::new(
            id,
            position,
            UnitQuaternion::identity(),
            DESIGNER_ASTEROID_SCALE,
            AsteroidModel::Jagged,
        ));
        self.asteroids.len() - 1
    }

    pub fn remove(&mut self, object: ObjectRef) -> Result<(), EditError> {
        self.check(object)?;
        match object {
            ObjectRef::Gate(i) => {
                self.gates.remove(i);
            }
            ObjectRef::Asteroid(i) => {
                self.asteroids.remove(i);
            }
        }
        Ok(())
    }

    pub fn translate(&mut self, object: ObjectRef, delta: Vector3<f64>) -> Result<(), EditError> {
        let (position, _) = self.pose_mut(object)?;
        *position += delta;
        Ok(())
    }

    /// Turn an object by `angle` radians about a world-frame axis.
    pub fn rotate(
        &mut self,
        object: ObjectRef,
        axis: Vector3<f64>,
        angle: f64,
    ) -> Result<(), EditError> {
        let axis = Unit::try_new(axis, NORMALIZE_EPSILON).ok_or(EditError::ZeroAxis)?;
        let (_, orientation) = self.pose_mut(object)?;
        *orientation = renormalize(&(UnitQuaternion::from_axis_angle(&axis, angle) * *orientation));
        Ok(())
    }

    /// Grow or shrink an asteroid. Scale never drops below the smallest
    /// rock the game spawns.
    pub fn resize_asteroid(&mut self, index: usize, delta: f64) -> Result<f64, EditError> {
        let asteroid = self
            .asteroids
            .get_mut(index)
            .ok_or(EditError::NoSuchAsteroid(index))?;
        asteroid.scale = (asteroid.scale + delta).max(MIN_ASTEROID_SCALE);
        asteroid.bounding_radius = asteroid.scale * asteroid.model.radius_factor();
        Ok(asteroid.scale)
    }

    pub fn set_asteroid_model(
        &mut self,
        index: usize,
        model: AsteroidModel,
    ) -> Result<(), EditError> {
        let asteroid = self
            .asteroids
            .get_mut(index)
            .ok_or(EditError::NoSuchAsteroid(index))?;
        asteroid.model = model;
        asteroid.bounding_radius = asteroid.scale * model.radius_factor();
        Ok(())
    }

    /// Move the gate at race position `from` to race position `to`.
    pub fn move_gate(&mut self, from: usize, to: usize) -> Result<(), EditError> {
        self.check(ObjectRef::Gate(from))?;
        self.check(ObjectRef::Gate(to))?;
        let gate = self.gates.remove(from);
        self.gates.insert(to, gate);
        Ok(())
    }

    /// Validated course with gates numbered from 0 in their current order.
    pub fn to_course(&self) -> Result<Course, LoadError> {
        let gates = self
            .gates
            .iter()
            .enumerate()
            .map(|(i, gate)| Gate {
                sequence_index: i as u32,
                ..gate.clone()
            })
            .collect();
        let course = Course::new(
            self.name.clone(),
            self.boundary,
            gates,
            self.asteroids.clone(),
        )?;
        info!(
            "Built course '{}' with {} gates and {} asteroids",
            course.name(),
            course.gates().len(),
            course.asteroids().len()
        );
        Ok(course)
    }

    fn check(&self, object: ObjectRef) -> Result<(), EditError> {
        match object {
            ObjectRef::Gate(i) if i >= self.gates.len() => Err(EditError::NoSuchGate(i)),
            ObjectRef::Asteroid(i) if i >= self.asteroids.len() => {
                Err(EditError::NoSuchAsteroid(i))
            }
            _ => Ok(()),
        }
    }

    fn pose_mut(
        &mut self,
        object: ObjectRef,
    ) -> Result<(&mut Vector3<f64>, &mut UnitQuaternion<f64>), EditError> {
        match object {
            ObjectRef::Gate(i) => self
                .gates
                .get_mut(i)
                .map(|g| (&mut g.position, &mut g.orientation))
                .ok_or(EditError::NoSuchGate(i)),
            ObjectRef::Asteroid(i) => self
                .asteroids
                .get_mut(i)
                .map(|a| (&mut a.position, &mut a.orientation))
                .ok_or(EditError::NoSuchAsteroid(i)),
        }
    }
}

/// Hand out `next` and advance it. Once the counter is spent, fall back to
/// the lowest id not in `used`.
fn allocate_id(next: &mut Option<u32>, mut used: Vec<u32>) -> u32 {
    if let Some(id) = *next {
        *next = id.checked_add(1);
        return id;
    }
    used.sort_unstable();
    used.dedup();
    used.iter()
        .zip(0u32..)
        .find(|(taken, candidate)| **taken != *candidate)
        .map_or(used.len() as u32, |(_, candidate)| candidate)
}
