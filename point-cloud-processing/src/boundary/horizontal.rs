/// Horizontal boundary: monotone chain hull of the (x, y) projection
use super::{BoundarySet, position_key};
use crate::point::Point;
use constants::boundary::MIN_HORIZONTAL_HULL_POINTS;
use std::collections::HashSet;

/// z component of (a - o) × (b - o). Positive for a counter-clockwise turn.
fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Andrew's monotone chain over `coords`.
/// Returns indices into `coords` of the hull vertices in counter-clockwise
/// order. Collinear and coincident points are popped, so only strictly
/// convex turns survive.
pub(crate) fn monotone_chain(coords: &[[f64; 2]]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..coords.len()).collect();
    order.sort_by(|&a, &b| {
        coords[a][0]
            .total_cmp(&coords[b][0])
            .then(coords[a][1].total_cmp(&coords[b][1]))
    });

    if order.len() < MIN_HORIZONTAL_HULL_POINTS {
        return order;
    }

    let build_chain = |sequence: &mut dyn Iterator<Item = usize>| {
        let mut chain: Vec<usize> = Vec::with_capacity(coords.len());
        for candidate in sequence {
            while chain.len() >= 2
                && cross(
                    coords[chain[chain.len() - 2]],
                    coords[chain[chain.len() - 1]],
                    coords[candidate],
                ) <= 0.0
            {
                chain.pop();
            }
            chain.push(candidate);
        }
        chain
    };

    let mut lower = build_chain(&mut order.iter().copied());
    let mut upper = build_chain(&mut order.iter().rev().copied());

    // Each chain ends where the other begins.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Boundary indices of the 2D hull of the (x, y) projection.
/// Every original index sharing a hull position is included.
pub fn horizontal_boundary(points: &[Point]) -> BoundarySet {
    if points.len() < MIN_HORIZONTAL_HULL_POINTS {
        return (0..points.len()).collect();
    }

    let projected: Vec<[f64; 2]> = points.iter().map(|p| [p.x, p.y]).collect();
    let hull_keys: HashSet<[u64; 2]> = monotone_chain(&projected)
        .into_iter()
        .map(|i| position_key(projected[i]))
        .collect();

    projected
        .iter()
        .enumerate()
        .filter(|(_, position)| hull_keys.contains(&position_key(**position)))
        .map(|(index, _)| index)
        .collect()
}
