use bevy::log::info;
use nalgebra::{UnitQuaternion, Vector3};
use rand::distributions::Uniform;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::model::{Asteroid, AsteroidId, AsteroidModel, Course, Gate, GateId};
use crate::utils::{
    ConfigError, SeedStreams, SimError, ASTEROID_SAFE_RADIUS, DEFAULT_GATE_HALF_SIZE,
    MAX_ASTEROID_SCALE, MIN_ASTEROID_SCALE, NORMALIZE_EPSILON,
};

/// Parameters for building a procedural course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseGeneratorConfig {
    pub name: String,
    pub seed: u64,
    pub asteroid_count: usize,
    /// Edge length of the cube asteroids are scattered in [m]
    pub field_size: f64,
    pub min_asteroid_scale: f64,
    pub max_asteroid_scale: f64,
    /// Asteroids are pushed out of this sphere around the start [m]
    pub safe_radius: f64,
    pub boundary_size: f64,
}

impl Default for CourseGeneratorConfig {
    fn default() -> Self {
        Self {
            name: "Generated Course".to_string(),
            seed: 42,
            asteroid_count: 150,
            field_size: 8000.0,
            min_asteroid_scale: MIN_ASTEROID_SCALE,
            max_asteroid_scale: MAX_ASTEROID_SCALE,
            safe_radius: ASTEROID_SAFE_RADIUS,
            boundary_size: 20000.0,
        }
    }
}

impl CourseGeneratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_field(
            self.field_size,
            (self.min_asteroid_scale, self.max_asteroid_scale),
            self.safe_radius,
        )?;
        if !self.boundary_size.is_finite() || self.boundary_size <= 0.0 {
            return Err(ConfigError::invalid("boundary_size", self.boundary_size));
        }
        Ok(())
    }
}

fn validate_field(
    field_size: f64,
    scale_range: (f64, f64),
    safe_radius: f64,
) -> Result<(), ConfigError> {
    let (min_scale, max_scale) = scale_range;
    if !field_size.is_finite() || field_size < 0.0 {
        return Err(ConfigError::invalid("field_size", field_size));
    }
    if !min_scale.is_finite() || min_scale <= 0.0 {
        return Err(ConfigError::invalid("min_asteroid_scale", min_scale));
    }
    if !max_scale.is_finite() || max_scale < min_scale {
        return Err(ConfigError::invalid("max_asteroid_scale", max_scale));
    }
    if !safe_radius.is_finite() || safe_radius < 0.0 {
        return Err(ConfigError::invalid("safe_radius", safe_radius));
    }
    Ok(())
}

/// The stock eight-gate winding course.
pub fn default_gate_course() -> Vec<Gate> {
    let path: [([f64; 3], Vector3<f64>, f64); 8] = [
        ([0.0, 0.0, 500.0], Vector3::x(), 0.0),
        ([400.0, 200.0, 1000.0], Vector3::y(), FRAC_PI_4),
        ([400.0, 200.0, 1500.0], Vector3::y(), FRAC_PI_2),
        ([0.0, 400.0, 2000.0], Vector3::x(), -FRAC_PI_4),
        ([-400.0, 0.0, 2500.0], Vector3::y(), -FRAC_PI_2),
        ([-400.0, -200.0, 3000.0], Vector3::y(), -FRAC_PI_4),
        ([0.0, -400.0, 3500.0], Vector3::x(), FRAC_PI_4),
        ([0.0, 0.0, 4000.0], Vector3::x(), 0.0),
    ];

    path.iter()
        .enumerate()
        .map(|(i, (position, axis, angle))| Gate {
            id: GateId(i as u32),
            position: Vector3::from(*position),
            orientation: UnitQuaternion::from_scaled_axis(axis * *angle),
            width: 2.0 * DEFAULT_GATE_HALF_SIZE,
            height: 2.0 * DEFAULT_GATE_HALF_SIZE,
            sequence_index: i as u32,
        })
        .collect()
}

/// Scatter `count` asteroids uniformly through a cube of edge `field_size`
/// centred on the origin, keeping the start sphere clear.
pub fn generate_asteroid_field<R: Rng>(
    rng: &mut R,
    count: usize,
    field_size: f64,
    scale_range: (f64, f64),
    safe_radius: f64,
) -> Result<Vec<Asteroid>, ConfigError> {
    validate_field(field_size, scale_range, safe_radius)?;
    let half = field_size / 2.0;
    let coordinate = Uniform::new_inclusive(-half, half);
    let (min_scale, max_scale) = scale_range;

    let asteroids: Vec<Asteroid> = (0..count)
        .map(|i| {
            let mut position = Vector3::new(
                rng.sample(&coordinate),
                rng.sample(&coordinate),
                rng.sample(&coordinate),
            );
            let distance = position.norm();
            if distance < safe_radius {
                position = if distance > NORMALIZE_EPSILON {
                    position / distance * safe_radius
                } else {
                    Vector3::y() * safe_radius
                };
            }

            let scale = if max_scale > min_scale {
                rng.gen_range(min_scale..max_scale)
            } else {
                min_scale
            };
            let model = AsteroidModel::ALL[rng.gen_range(0..AsteroidModel::ALL.len())];

            Asteroid::new(
                AsteroidId(i as u32),
                position,
                UnitQuaternion::identity(),
                scale,
                model,
            )
        })
        .collect();
    Ok(asteroids)
}

/// Build the stock gates plus a seeded asteroid field.
pub fn generate_course(config: &CourseGeneratorConfig) -> Result<Course, SimError> {
    config.validate()?;
    let mut rng = SeedStreams::new(config.seed).stream("asteroid_field");
    let asteroids = generate_asteroid_field(
        &mut rng,
        config.asteroid_count,
        config.field_size,
        (config.min_asteroid_scale, config.max_asteroid_scale),
        config.safe_radius,
    )?;

    info!(
        "Generated course '{}' (seed {}) with {} asteroids",
        config.name,
        config.seed,
        asteroids.len()
    );

    let course = Course::new(
        config.name.clone(),
        Vector3::repeat(config.boundary_size),
        default_gate_course(),
        asteroids,
    )?;
    Ok(course)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gates_are_in_sequence() {
        let gates = default_gate_course();
        assert_eq!(gates.len(), 8);
        for (i, gate) in gates.iter().enumerate() {
            assert_eq!(gate.sequence_index, i as u32);
            assert_eq!(gate.width, 80.0);
        }
        // Gates climb steadily along +Z
        assert!(gates.windows(2).all(|w| w[1].position.z > w[0].position.z));
    }

    #[test]
    fn test_field_respects_safe_radius_and_scale() {
        let mut rng = SeedStreams::new(7).stream("test");
        let field =
            generate_asteroid_field(&mut rng, 200, 2000.0, (10.0, 60.0), 300.0).unwrap();
        assert_eq!(field.len(), 200);
        for asteroid in &field {
            assert!(asteroid.position.norm() >= 300.0 - 1e-9);
            assert!((10.0..60.0).contains(&asteroid.scale));
        }
    }

    #[test]
    fn test_generation_is_reproducible() {
        let config = CourseGeneratorConfig {
            asteroid_count: 40,
            ..Default::default()
        };
        let a = generate_course(&config).unwrap();
        let b = generate_course(&config).unwrap();
        assert_eq!(a, b);

        let other = generate_course(&CourseGeneratorConfig {
            seed: config.seed + 1,
            ..config.clone()
        })
        .unwrap();
        assert_ne!(a.asteroids(), other.asteroids());
    }

    #[test]
    fn test_bad_field_parameters_are_rejected() {
        let config = CourseGeneratorConfig {
            field_size: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            generate_course(&config),
            Err(SimError::Config(ConfigError::InvalidParameter { name, .. }))
                if name == "field_size"
        ));

        let mut rng = SeedStreams::new(1).stream("test");
        assert!(generate_asteroid_field(&mut rng, 5, 100.0, (-1.0, 5.0), 0.0).is_err());
        assert!(generate_asteroid_field(&mut rng, 5, 100.0, (10.0, f64::NAN), 0.0).is_err());
        assert!(generate_asteroid_field(&mut rng, 5, f64::NAN, (10.0, 20.0), 0.0).is_err());
    }
}
