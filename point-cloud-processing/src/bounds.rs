/// Point cloud coordinate bounds tracking
use crate::point::Point;
use constants::processing::PARALLEL_CHUNK_SIZE;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for PointCloudBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCloudBounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Calculate bounds of a point slice.
    /// Large clouds are reduced in parallel chunks.
    pub fn from_points(points: &[Point]) -> Self {
        if points.len() <= PARALLEL_CHUNK_SIZE {
            let mut bounds = Self::new();
            points.iter().for_each(|p| bounds.update(p.x, p.y, p.z));
            return bounds;
        }

        points
            .par_chunks(PARALLEL_CHUNK_SIZE)
            .map(|chunk| {
                let mut local_bounds = Self::new();
                for point in chunk {
                    local_bounds.update(point.x, point.y, point.z);
                }
                local_bounds
            })
            .reduce_with(|a, b| a.merge(&b))
            .unwrap_or_else(Self::new)
    }

    /// Update bounds with a new point
    pub fn update(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    pub fn merge(mut self, other: &Self) -> Self {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
        self.min_z = self.min_z.min(other.min_z);
        self.max_z = self.max_z.max(other.max_z);
        self
    }

    /// True until at least one point has been added
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x
    }

    /// World space dimensions
    pub fn dimensions(&self) -> (f64, f64, f64) {
        if self.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }

    pub fn volume(&self) -> f64 {
        let (dx, dy, dz) = self.dimensions();
        dx * dy * dz
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f64 {
        let (dx, dy, dz) = self.dimensions();
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Zero width along any axis (flat, linear or single-point cloud)
    pub fn is_degenerate(&self) -> bool {
        let (dx, dy, dz) = self.dimensions();
        dx <= 0.0 || dy <= 0.0 || dz <= 0.0
    }

    pub fn min(&self) -> [f64; 3] {
        [self.min_x, self.min_y, self.min_z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_of_box() {
        let points = vec![
            Point::new(-1.0, 2.0, 0.5),
            Point::new(3.0, -2.0, 1.5),
            Point::new(0.0, 0.0, 4.5),
        ];
        let bounds = PointCloudBounds::from_points(&points);
        assert_eq!(bounds.dimensions(), (4.0, 4.0, 4.0));
        assert_relative_eq!(bounds.volume(), 64.0);
        assert!(!bounds.is_degenerate());
        assert_eq!(bounds.min(), [-1.0, -2.0, 0.5]);
    }

    #[test]
    fn test_empty_and_flat_bounds() {
        let empty = PointCloudBounds::from_points(&[]);
        assert!(empty.is_empty());
        assert_eq!(empty.dimensions(), (0.0, 0.0, 0.0));
        assert!(empty.is_degenerate());

        let flat = PointCloudBounds::from_points(&[
            Point::new(0.0, 0.0, 1.0),
            Point::new(5.0, 5.0, 1.0),
        ]);
        assert!(flat.is_degenerate());
        assert_eq!(flat.volume(), 0.0);
    }

    #[test]
    fn test_parallel_bounds_match_sequential() {
        let points: Vec<Point> = (0..PARALLEL_CHUNK_SIZE * 3 + 7)
            .map(|i| {
                let f = i as f64;
                Point::new(f.sin() * 10.0, f.cos() * 20.0, f * 0.001)
            })
            .collect();

        let mut sequential = PointCloudBounds::new();
        points.iter().for_each(|p| sequential.update(p.x, p.y, p.z));

        assert_eq!(PointCloudBounds::from_points(&points), sequential);
    }
}
