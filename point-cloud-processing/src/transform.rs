/// Whole-cloud point transforms
use crate::point::Point;

/// Negate the elevation of every point.
/// x, y and colour pass through unchanged.
pub fn invert_elevation(points: &[Point]) -> Vec<Point> {
    points.iter().map(|p| Point { z: -p.z, ..*p }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inversion_is_self_inverse() {
        let points = vec![
            Point::with_colour(1.0, 2.0, 3.5, 9, 8, 7),
            Point::new(-4.0, 0.25, -12.0),
            Point::new(0.0, 0.0, 0.0),
        ];

        let inverted = invert_elevation(&points);
        assert_eq!(inverted[0].z, -3.5);
        assert_eq!(inverted[1].z, 12.0);
        for (before, after) in points.iter().zip(&inverted) {
            assert_eq!((before.x, before.y, before.colour), (after.x, after.y, after.colour));
        }

        assert_eq!(invert_elevation(&inverted), points);
    }

    #[test]
    fn test_empty_cloud() {
        assert!(invert_elevation(&[]).is_empty());
    }
}
