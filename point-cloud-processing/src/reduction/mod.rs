//! Density reduction.
//!
//! Every call works from the original cloud. Points whose indices are in the
//! keep-set are copied through untouched and only the remaining interior is
//! reduced, so boundary points survive any percentage.

pub mod gradient;
pub mod voxel;

use crate::boundary::BoundarySet;
use crate::point::Point;
use constants::reduction::FULL_PERCENTAGE;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ReductionMethod {
    /// Centroid of each occupied voxel
    #[default]
    Voxel,
    /// Keep the points with the steepest sampled local slope
    Gradient,
    /// Unrecognised method name, the input passes through unchanged
    Identity,
}

impl fmt::Display for ReductionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReductionMethod::Voxel => write!(f, "voxel"),
            ReductionMethod::Gradient => write!(f, "gradient"),
            ReductionMethod::Identity => write!(f, "identity"),
        }
    }
}

impl FromStr for ReductionMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "voxel" => ReductionMethod::Voxel,
            "gradient" => ReductionMethod::Gradient,
            _ => ReductionMethod::Identity,
        })
    }
}

impl From<String> for ReductionMethod {
    fn from(name: String) -> Self {
        match name.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl From<ReductionMethod> for String {
    fn from(method: ReductionMethod) -> Self {
        method.to_string()
    }
}

/// Split of the cloud into always-kept and reducible points
struct Partition {
    boundary: Vec<Point>,
    interior: Vec<Point>,
}

impl Partition {
    fn new(points: &[Point], keep: Option<&BoundarySet>) -> Self {
        let (boundary, interior): (Vec<(usize, &Point)>, Vec<(usize, &Point)>) = points
            .iter()
            .enumerate()
            .partition(|(i, _)| keep.is_some_and(|set| set.contains(i)));

        Self {
            boundary: boundary.into_iter().map(|(_, p)| *p).collect(),
            interior: interior.into_iter().map(|(_, p)| *p).collect(),
        }
    }
}

/// Number of points a reduction to `percentage` aims for, never below one
pub fn total_target(point_count: usize, percentage: f64) -> usize {
    ((point_count as f64 * percentage / 100.0).floor() as usize).max(1)
}

/// Reduce a cloud to roughly `target_percentage` of its points.
///
/// Output is the kept boundary points in original order followed by the
/// reduced interior. A percentage of 100 or more returns the input as is.
/// `rng` drives the gradient method's neighbour sampling and tie-breaking.
pub fn reduce_point_cloud<R: Rng + ?Sized>(
    points: &[Point],
    method: ReductionMethod,
    target_percentage: f64,
    boundary: Option<&BoundarySet>,
    rng: &mut R,
) -> Vec<Point> {
    if method == ReductionMethod::Identity {
        warn!("Unknown reduction method, returning the cloud unchanged");
        return points.to_vec();
    }
    if points.is_empty() || target_percentage >= FULL_PERCENTAGE {
        return points.to_vec();
    }

    let partition = Partition::new(points, boundary);
    let total_target = total_target(points.len(), target_percentage);

    if partition.boundary.len() >= total_target {
        debug!(
            boundary = partition.boundary.len(),
            total_target, "Boundary alone meets the target, interior discarded"
        );
        return partition.boundary;
    }

    let interior_target = (total_target - partition.boundary.len()).max(1);
    let reduced = match method {
        ReductionMethod::Voxel => {
            voxel::downsample(&partition.interior, interior_target, target_percentage)
        }
        ReductionMethod::Gradient => {
            gradient::sample(&partition.interior, points, interior_target, rng)
        }
        ReductionMethod::Identity => partition.interior,
    };

    debug!(
        method = %method,
        input = points.len(),
        boundary = partition.boundary.len(),
        interior_target,
        interior_kept = reduced.len(),
        "Reduction finished"
    );

    let mut output = partition.boundary;
    output.extend(reduced);
    output
}
