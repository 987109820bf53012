//! Point cloud boundary detection, density reduction and export.
//!
//! The geometry core is four pure functions:
//! [`identify_boundary_points`], [`reduce_point_cloud`],
//! [`invert_elevation`] and [`export_to_text`]. The rest of the crate
//! loads clouds from disk, drives the core from a [`ProcessingConfig`] and
//! writes the results.

pub mod boundary;
pub mod bounds;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod manifest;
pub mod point;
pub mod processor;
pub mod reduction;
pub mod transform;

pub use boundary::{BoundaryMode, BoundarySet, identify_boundary_points};
pub use config::ProcessingConfig;
pub use error::{ProcessingError, Result};
pub use export::export_to_text;
pub use point::{Colour, Point};
pub use processor::PointCloudProcessor;
pub use reduction::{ReductionMethod, reduce_point_cloud};
pub use transform::invert_elevation;
