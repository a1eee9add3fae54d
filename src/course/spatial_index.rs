use kiddo::distance::squared_euclidean;
use kiddo::KdTree;
use nalgebra::Vector3;

use super::model::Course;

/// k-d tree over asteroid centres. Items are indices into
/// [`Course::asteroids`].
pub struct AsteroidIndex {
    tree: KdTree<f64, 3>,
    len: usize,
}

impl std::fmt::Debug for AsteroidIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsteroidIndex").field("len", &self.len).finish()
    }
}

impl AsteroidIndex {
    pub fn build(course: &Course) -> Self {
        let mut tree: KdTree<f64, 3> = KdTree::new();
        for (index, asteroid) in course.asteroids().iter().enumerate() {
            let p = asteroid.position;
            tree.add(&[p.x, p.y, p.z], index);
        }
        Self {
            tree,
            len: course.asteroids().len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of asteroids whose centre lies within `radius` of `center`,
    /// in ascending order.
    pub fn within(&self, center: &Vector3<f64>, radius: f64) -> Vec<usize> {
        if self.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }
        let mut indices: Vec<usize> = self
            .tree
            .within_unsorted(
                &[center.x, center.y, center.z],
                radius * radius,
                &squared_euclidean,
            )
            .into_iter()
            .map(|neighbour| neighbour.item)
            .collect();
        indices.sort_unstable();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Asteroid, AsteroidId, AsteroidModel};
    use nalgebra::UnitQuaternion;

    fn course_with(positions: &[[f64; 3]]) -> Course {
        let asteroids = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Asteroid::new(
                    AsteroidId(i as u32),
                    Vector3::from(*p),
                    UnitQuaternion::identity(),
                    10.0,
                    AsteroidModel::Jagged,
                )
            })
            .collect();
        Course::new("index", Vector3::new(1e5, 1e5, 1e5), vec![], asteroids).unwrap()
    }

    #[test]
    fn test_within_returns_nearby_only() {
        let course = course_with(&[
            [0.0, 0.0, 0.0],
            [50.0, 0.0, 0.0],
            [0.0, 500.0, 0.0],
            [-30.0, 10.0, 5.0],
        ]);
        let index = AsteroidIndex::build(&course);
        assert_eq!(index.len(), 4);
        assert_eq!(index.within(&Vector3::zeros(), 60.0), vec![0, 1, 3]);
        assert_eq!(index.within(&Vector3::new(0.0, 480.0, 0.0), 25.0), vec![2]);
        assert!(index.within(&Vector3::new(1000.0, 0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn test_empty_course() {
        let course = course_with(&[]);
        let index = AsteroidIndex::build(&course);
        assert!(index.is_empty());
        assert!(index.within(&Vector3::zeros(), 1e9).is_empty());
    }
}
