//! Boundary (edge) detection via convex hulls.
//!
//! Two policies are supported. [`BoundaryMode::Horizontal`] drops z and
//! runs a 2D monotone chain over the (x, y) projection.
//! [`BoundaryMode::Volumetric`] builds the 3D hull and keeps its corner
//! vertices. Both are pure functions of the input slice.

mod horizontal;
mod volumetric;

pub use horizontal::horizontal_boundary;
pub use volumetric::volumetric_boundary;

pub(crate) use horizontal::monotone_chain;

use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Unique 0-based indices into the original cloud, iterated in ascending order.
pub type BoundarySet = BTreeSet<usize>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// 2D hull of the (x, y) projection
    #[default]
    Horizontal,
    /// 3D hull of the full positions
    Volumetric,
}

impl fmt::Display for BoundaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryMode::Horizontal => write!(f, "horizontal"),
            BoundaryMode::Volumetric => write!(f, "volumetric"),
        }
    }
}

impl FromStr for BoundaryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "2d" => Ok(BoundaryMode::Horizontal),
            "volumetric" | "3d" => Ok(BoundaryMode::Volumetric),
            other => Err(format!(
                "unknown boundary mode '{other}' (expected horizontal or volumetric)"
            )),
        }
    }
}

/// Identify the indices of points lying on the convex hull of the cloud.
pub fn identify_boundary_points(points: &[Point], mode: BoundaryMode) -> BoundarySet {
    let boundary = match mode {
        BoundaryMode::Horizontal => horizontal_boundary(points),
        BoundaryMode::Volumetric => volumetric_boundary(points),
    };

    debug!(
        mode = %mode,
        points = points.len(),
        boundary = boundary.len(),
        "Boundary detection finished"
    );
    boundary
}

/// Bit pattern key for exact position equality. Negative zero folds into zero.
pub(crate) fn position_key<const D: usize>(coords: [f64; D]) -> [u64; D] {
    coords.map(|c| (c + 0.0).to_bits())
}

/// Collapse exactly coincident positions.
/// Returns the distinct positions in first-seen order and the original
/// indices sharing each one.
pub(crate) fn group_positions<const D: usize>(
    coords: impl IntoIterator<Item = [f64; D]>,
) -> (Vec<[f64; D]>, Vec<Vec<usize>>) {
    let mut slots: HashMap<[u64; D], usize> = HashMap::new();
    let mut unique = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();

    for (index, position) in coords.into_iter().enumerate() {
        let slot = *slots.entry(position_key(position)).or_insert_with(|| {
            unique.push(position);
            members.push(Vec::new());
            unique.len() - 1
        });
        members[slot].push(index);
    }

    (unique, members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("horizontal".parse(), Ok(BoundaryMode::Horizontal));
        assert_eq!("3D".parse(), Ok(BoundaryMode::Volumetric));
        assert!("sideways".parse::<BoundaryMode>().is_err());
        assert_eq!(BoundaryMode::default(), BoundaryMode::Horizontal);
        assert_eq!(BoundaryMode::Volumetric.to_string(), "volumetric");
    }

    #[test]
    fn test_group_positions_folds_negative_zero() {
        let (unique, members) =
            group_positions([[0.0, 1.0], [-0.0, 1.0], [2.0, 1.0], [0.0, 1.0]]);
        assert_eq!(unique.len(), 2);
        assert_eq!(members, vec![vec![0, 1, 3], vec![2]]);
    }

    #[test]
    fn test_empty_cloud_has_no_boundary() {
        assert!(identify_boundary_points(&[], BoundaryMode::Horizontal).is_empty());
        assert!(identify_boundary_points(&[], BoundaryMode::Volumetric).is_empty());
    }
}
