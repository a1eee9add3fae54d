use bevy::prelude::*;
use nalgebra::Vector3;

use crate::{
    components::{
        CollisionComponent, CollisionContact, CollisionEvent, PreviousPosition, RaceProgress,
        SpatialComponent,
    },
    course::{AsteroidIndex, Course},
    resources::{CourseResource, PhysicsConfig},
    utils::{closest_segment_parameter, lerp_point, normalize_or_zero},
};

pub fn collision_detection_system(
    mut query: Query<(
        Entity,
        &SpatialComponent,
        &PreviousPosition,
        &mut CollisionComponent,
        Option<&RaceProgress>,
    )>,
    course: Option<Res<CourseResource>>,
    physics: Res<PhysicsConfig>,
    mut collision_events: EventWriter<CollisionEvent>,
) {
    let Some(course) = course else {
        return;
    };
    let dt = physics.timestep.min(physics.max_timestep);

    for (entity, spatial, previous, mut collision, progress) in query.iter_mut() {
        let contacts = detect_collisions(
            &previous.0,
            &spatial.position,
            collision.radius,
            &course.course,
            &course.index,
        );
        let race_time = progress.map_or(0.0, |p| p.elapsed) + dt;
        collision.register_contacts(&contacts, race_time);

        for contact in contacts {
            debug!("Entity {:?} hit asteroid {}", entity, contact.asteroid_id);
            collision_events.send(CollisionEvent { entity, contact });
        }
    }
}

/// Every asteroid touched by a sphere of `radius` swept from `start` to
/// `end`, ordered by asteroid id.
///
/// The k-d tree narrows the search to asteroids near the segment; each
/// candidate is then tested against the closest point of the path.
pub fn detect_collisions(
    start: &Vector3<f64>,
    end: &Vector3<f64>,
    radius: f64,
    course: &Course,
    index: &AsteroidIndex,
) -> Vec<CollisionContact> {
    let midpoint = lerp_point(start, end, 0.5);
    let search_radius = (end - start).norm() / 2.0 + radius + course.max_asteroid_radius();

    let mut contacts: Vec<CollisionContact> = index
        .within(&midpoint, search_radius)
        .into_iter()
        .filter_map(|i| course.asteroids().get(i))
        .filter_map(|asteroid| {
            check_collision(
                start,
                end,
                radius,
                &asteroid.position,
                asteroid.bounding_radius,
            )
            .map(|(normal, depth)| CollisionContact {
                asteroid_id: asteroid.id,
                impact_point: asteroid.position + normal * asteroid.bounding_radius,
                normal,
                penetration_depth: depth,
            })
        })
        .collect();

    contacts.sort_by_key(|c| c.asteroid_id);
    contacts
}

/// Sphere swept along `start..end` against a static sphere. Returns the
/// contact normal (from the obstacle towards the path) and the overlap at
/// closest approach.
fn check_collision(
    start: &Vector3<f64>,
    end: &Vector3<f64>,
    radius: f64,
    center: &Vector3<f64>,
    obstacle_radius: f64,
) -> Option<(Vector3<f64>, f64)> {
    let t = closest_segment_parameter(start, end, center);
    let closest = lerp_point(start, end, t);
    let offset = closest - center;
    let distance = offset.norm();
    let reach = radius + obstacle_radius;

    if distance > reach {
        return None;
    }

    // Path straight through the centre: push back along the direction of travel
    let mut normal = normalize_or_zero(&offset);
    if normal == Vector3::zeros() {
        normal = -normalize_or_zero(&(end - start));
    }
    Some((normal, reach - distance))
}
