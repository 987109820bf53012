/// Voxel grid centroid downsampling
use crate::bounds::PointCloudBounds;
use crate::point::{Colour, Point};
use constants::reduction::{MIN_VOXEL_SCALE, VOXEL_SCALE_BIAS, VOXEL_SCALE_EXPONENT};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Integer grid cell of a point
pub type VoxelKey = [i64; 3];

/// Voxel edge length for a cloud of `count` points inside `bounds`.
/// Grows with (100 / percentage)^1.5 from the average point spacing.
pub fn voxel_size(bounds: &PointCloudBounds, count: usize, percentage: f64) -> f64 {
    let average_spacing = (bounds.volume() / count as f64).cbrt();
    let scale_factor = (100.0 / percentage).powf(VOXEL_SCALE_EXPONENT);
    average_spacing * (scale_factor - VOXEL_SCALE_BIAS).max(MIN_VOXEL_SCALE)
}

pub fn voxel_key(point: &Point, min: [f64; 3], size: f64) -> VoxelKey {
    [
        ((point.x - min[0]) / size).floor() as i64,
        ((point.y - min[1]) / size).floor() as i64,
        ((point.z - min[2]) / size).floor() as i64,
    ]
}

/// Running sums for one occupied voxel
#[derive(Debug, Clone, Default)]
struct VoxelAccumulator {
    position: [f64; 3],
    colour: [u64; 3],
    count: usize,
    uncoloured: usize,
}

impl VoxelAccumulator {
    fn add(&mut self, point: &Point) {
        self.position[0] += point.x;
        self.position[1] += point.y;
        self.position[2] += point.z;
        match point.colour {
            Colour::Present { r, g, b } => {
                self.colour[0] += u64::from(r);
                self.colour[1] += u64::from(g);
                self.colour[2] += u64::from(b);
            }
            Colour::Absent => self.uncoloured += 1,
        }
        self.count += 1;
    }

    /// Mean position, plus mean colour when every member was coloured
    fn centroid(&self) -> Point {
        let n = self.count as f64;
        let channel = |sum: u64| (sum as f64 / n).round().clamp(0.0, 255.0) as u8;
        let colour = if self.uncoloured == 0 {
            Colour::Present {
                r: channel(self.colour[0]),
                g: channel(self.colour[1]),
                b: channel(self.colour[2]),
            }
        } else {
            Colour::Absent
        };

        Point {
            x: self.position[0] / n,
            y: self.position[1] / n,
            z: self.position[2] / n,
            colour,
        }
    }
}

/// Group point indices by voxel, in order of first occupancy
pub fn group_by_voxel(points: &[Point], min: [f64; 3], size: f64) -> Vec<(VoxelKey, Vec<usize>)> {
    let keys: Vec<VoxelKey> = points.par_iter().map(|p| voxel_key(p, min, size)).collect();

    let mut slots: HashMap<VoxelKey, usize> = HashMap::new();
    let mut groups: Vec<(VoxelKey, Vec<usize>)> = Vec::new();
    for (index, key) in keys.into_iter().enumerate() {
        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(index);
    }
    groups
}

/// Replace each occupied voxel by the centroid of its members.
///
/// The result size is the number of occupied voxels, which only
/// approximates `target`. Clouds with zero extent along any axis return
/// their first `target` points.
pub fn downsample(points: &[Point], target: usize, percentage: f64) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }

    let bounds = PointCloudBounds::from_points(points);
    if bounds.is_degenerate() {
        warn!(
            points = points.len(),
            "Degenerate bounding volume, keeping leading points instead of voxelising"
        );
        return points.iter().take(target).copied().collect();
    }

    let size = voxel_size(&bounds, points.len(), percentage);
    let groups = group_by_voxel(points, bounds.min(), size);

    debug!(
        voxel_size = size,
        voxels = groups.len(),
        target,
        "Voxel grid built"
    );

    groups
        .iter()
        .map(|(_, members)| {
            let mut accumulator = VoxelAccumulator::default();
            members.iter().for_each(|&i| accumulator.add(&points[i]));
            accumulator.centroid()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_voxel_size_formula() {
        let bounds = PointCloudBounds::from_points(&[
            Point::new(0.0, 0.0, 0.0),
            Point::new(10.0, 10.0, 10.0),
        ]);
        // spacing = cbrt(1000 / 1000) = 1, scale = 2^1.5
        let size = voxel_size(&bounds, 1000, 50.0);
        assert_relative_eq!(size, 2f64.powf(1.5) - 0.98, epsilon = 1e-12);

        // At 100% the biased factor is tiny but positive
        assert_relative_eq!(voxel_size(&bounds, 1000, 100.0), 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_minimum_scale_guard() {
        let bounds = PointCloudBounds::from_points(&[
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 1.0, 1.0),
        ]);
        // (100 / 99.9)^1.5 - 0.98 is well above the guard
        assert!(voxel_size(&bounds, 1, 99.9) > MIN_VOXEL_SCALE);
        // Out-of-contract percentages still give a usable size
        assert!(voxel_size(&bounds, 1, 200.0) > 0.0);
    }

    #[test]
    fn test_centroid_averages_position_and_colour() {
        let points = vec![
            Point::with_colour(0.1, 0.1, 0.1, 10, 20, 31),
            Point::with_colour(0.3, 0.3, 0.3, 20, 40, 60),
            Point::new(5.1, 5.1, 5.1),
            Point::with_colour(5.3, 5.3, 5.3, 200, 200, 200),
        ];
        let groups = group_by_voxel(&points, [0.0; 3], 1.0);
        assert_eq!(groups.len(), 2);

        let mut first = VoxelAccumulator::default();
        groups[0].1.iter().for_each(|&i| first.add(&points[i]));
        let centroid = first.centroid();
        assert_relative_eq!(centroid.x, 0.2, epsilon = 1e-12);
        assert_eq!(centroid.colour, Colour::Present { r: 15, g: 30, b: 46 });

        let mut second = VoxelAccumulator::default();
        groups[1].1.iter().for_each(|&i| second.add(&points[i]));
        assert_eq!(second.centroid().colour, Colour::Absent);
    }

    #[test]
    fn test_degenerate_volume_keeps_leading_points() {
        let points: Vec<Point> = (0..20).map(|i| Point::new(i as f64, (i * 2) as f64, 3.0)).collect();
        let out = downsample(&points, 5, 25.0);
        assert_eq!(out, points[..5].to_vec());
    }

    #[test]
    fn test_random_box_centroids_only_match_singletons() {
        let mut rng = StdRng::seed_from_u64(42);
        let points: Vec<Point> = (0..1000)
            .map(|_| {
                Point::new(
                    rng.gen_range(0.0..100.0),
                    rng.gen_range(0.0..100.0),
                    rng.gen_range(0.0..10.0),
                )
            })
            .collect();

        let out = downsample(&points, 500, 50.0);
        assert!(!out.is_empty());
        assert!(out.len() < points.len());

        let bounds = PointCloudBounds::from_points(&points);
        let size = voxel_size(&bounds, points.len(), 50.0);
        let groups = group_by_voxel(&points, bounds.min(), size);
        assert_eq!(out.len(), groups.len());

        for (centroid, (_, members)) in out.iter().zip(&groups) {
            let matches_input = points.iter().any(|p| p.position() == centroid.position());
            if matches_input {
                assert_eq!(members.len(), 1);
            }
        }
    }
}
