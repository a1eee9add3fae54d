use bevy::prelude::*;
use std::sync::Arc;

use crate::course::{AsteroidIndex, Course};

/// The loaded course, shared read-only by every racing entity.
#[derive(Resource, Debug, Clone)]
pub struct CourseResource {
    pub course: Arc<Course>,
    pub index: Arc<AsteroidIndex>,
}

impl CourseResource {
    pub fn new(course: Arc<Course>) -> Self {
        let index = Arc::new(AsteroidIndex::build(&course));
        Self { course, index }
    }
}
