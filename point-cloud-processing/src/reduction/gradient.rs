/// Gradient-weighted sampling favouring points on slopes and edges
use crate::point::Point;
use constants::reduction::{GRADIENT_NEIGHBOUR_RADIUS, GRADIENT_SAMPLE_COUNT};
use rand::Rng;

/// Steepest |dz| / horizontal distance seen across a few random neighbours.
///
/// Neighbours are drawn from the whole `cloud`. Only those strictly within
/// the neighbour radius and not horizontally coincident count; with none,
/// the score is zero.
pub fn gradient_score<R: Rng + ?Sized>(point: &Point, cloud: &[Point], rng: &mut R) -> f64 {
    if cloud.is_empty() {
        return 0.0;
    }

    let mut steepest = 0.0f64;
    for _ in 0..GRADIENT_SAMPLE_COUNT.min(cloud.len()) {
        let neighbour = &cloud[rng.gen_range(0..cloud.len())];
        let distance = point.horizontal_distance(neighbour);
        if distance > 0.0 && distance < GRADIENT_NEIGHBOUR_RADIUS {
            steepest = steepest.max((point.z - neighbour.z).abs() / distance);
        }
    }
    steepest
}

/// Keep the `target` interior points with the highest gradient score.
/// Equal scores are ordered by an independent random draw per point.
pub fn sample<R: Rng + ?Sized>(
    interior: &[Point],
    cloud: &[Point],
    target: usize,
    rng: &mut R,
) -> Vec<Point> {
    let mut ranked: Vec<(f64, f64, usize)> = interior
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let score = gradient_score(point, cloud, rng);
            (score, rng.r#gen::<f64>(), i)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.total_cmp(&b.1)));

    ranked
        .into_iter()
        .take(target)
        .map(|(_, _, i)| interior[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// 80 points on a steep ramp next to 20 points on a distant flat pad
    fn ramp_and_pad() -> Vec<Point> {
        let mut points: Vec<Point> = (0..80)
            .map(|i| {
                let x = i as f64 * 0.05;
                Point::new(x, (i % 7) as f64 * 0.3, 5.0 * x)
            })
            .collect();
        points.extend((0..20).map(|i| Point::new(100.0 + (i % 5) as f64, (i / 5) as f64, 0.0)));
        points
    }

    #[test]
    fn test_flat_cloud_scores_zero() {
        let cloud: Vec<Point> = (0..30).map(|i| Point::new(i as f64, 0.0, 2.0)).collect();
        let mut rng = StdRng::seed_from_u64(5);
        for point in &cloud {
            assert_eq!(gradient_score(point, &cloud, &mut rng), 0.0);
        }
    }

    #[test]
    fn test_distant_neighbours_are_ignored() {
        let cloud = vec![Point::new(0.0, 0.0, 0.0), Point::new(50.0, 0.0, 100.0)];
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(gradient_score(&cloud[0], &cloud, &mut rng), 0.0);
    }

    #[test]
    fn test_slope_points_win() {
        let cloud = ramp_and_pad();
        let mut rng = StdRng::seed_from_u64(2024);

        let kept = sample(&cloud, &cloud, 50, &mut rng);
        assert_eq!(kept.len(), 50);
        assert!(kept.iter().all(|p| p.x < 50.0));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let cloud = ramp_and_pad();
        let first = sample(&cloud, &cloud, 30, &mut StdRng::seed_from_u64(77));
        let second = sample(&cloud, &cloud, 30, &mut StdRng::seed_from_u64(77));
        assert_eq!(first, second);
    }

    #[test]
    fn test_target_larger_than_interior() {
        let cloud = ramp_and_pad();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample(&cloud[..10], &cloud, 25, &mut rng).len(), 10);
    }
}
