/// Pipeline orchestrating load, boundary detection, reduction and export.
use crate::boundary::{BoundarySet, identify_boundary_points};
use crate::bounds::PointCloudBounds;
use crate::config::ProcessingConfig;
use crate::error::{ProcessingError, Result};
use crate::export::write_text;
use crate::loader::{is_las_path, load_points};
use crate::manifest::{BoundaryInfo, ProcessingReport, ReductionInfo};
use crate::point::Point;
use crate::reduction::reduce_point_cloud;
use crate::transform::invert_elevation;
use constants::io::COLOUR_DETECTION_SAMPLE_SIZE;
use constants::processing::{PROGRESS_CHARS, PROGRESS_TEMPLATE};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A freshly loaded cloud with the facts every stage needs.
#[derive(Debug, Clone)]
pub struct LoadedCloud {
    pub points: Vec<Point>,
    pub bounds: PointCloudBounds,
    pub has_colour: bool,
}

/// Progress bar for point loading
fn loading_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    match ProgressStyle::with_template(PROGRESS_TEMPLATE) {
        Ok(style) => pb.set_style(style.progress_chars(PROGRESS_CHARS)),
        Err(err) => warn!(%err, "Invalid progress template, using default style"),
    }
    pb.set_message("Loading points");
    pb
}

/// Detect if colour data exists in the point cloud.
/// Samples initial points to determine RGB availability.
pub fn detect_colour_data(points: &[Point]) -> bool {
    let sample = &points[..points.len().min(COLOUR_DETECTION_SAMPLE_SIZE)];
    let colour_count = sample.iter().filter(|p| p.has_colour()).count();

    if colour_count > 0 {
        info!(
            "Colour data detected: {}/{} sample points have RGB",
            colour_count,
            sample.len()
        );
    } else {
        info!("No colour data found");
    }
    colour_count > 0
}

/// Load a cloud from disk and log what was found.
/// A file without a single valid point is an error.
pub fn load_cloud(path: &Path) -> Result<LoadedCloud> {
    info!(
        file = %path.display(),
        format = if is_las_path(path) { "las" } else { "text" },
        "Loading point cloud"
    );

    let pb = loading_progress();
    let points = load_points(path, &pb)?;
    pb.finish_with_message("Points loaded");

    if points.is_empty() {
        return Err(ProcessingError::EmptyCloud(path.to_path_buf()));
    }

    let has_colour = detect_colour_data(&points);
    let bounds = PointCloudBounds::from_points(&points);
    log_bounds(points.len(), &bounds);

    Ok(LoadedCloud {
        points,
        bounds,
        has_colour,
    })
}

/// Log coordinate bounds information for validation.
fn log_bounds(point_count: usize, bounds: &PointCloudBounds) {
    info!(points = point_count, "Cloud loaded");
    info!("  X: {:.2} to {:.2}", bounds.min_x, bounds.max_x);
    info!("  Y: {:.2} to {:.2}", bounds.min_y, bounds.max_y);
    info!("  Z: {:.2} to {:.2} (elevation)", bounds.min_z, bounds.max_z);
}

/// Runs the full pipeline for one input file.
/// Reduction always starts from the loaded original cloud.
pub struct PointCloudProcessor {
    /// Cloud to read, text or LAS/LAZ.
    input_path: PathBuf,
    /// Text file to write the processed cloud to.
    output_path: PathBuf,
    config: ProcessingConfig,
}

impl PointCloudProcessor {
    /// Create a processor, validating the configuration up front.
    pub fn new(input_path: &Path, output_path: &Path, config: ProcessingConfig) -> Result<Self> {
        if !input_path.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Input file does not exist: {}", input_path.display()),
            )
            .into());
        }

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path.to_path_buf(),
            config: config.validate()?,
        })
    }

    /// Boundary indices when preservation is on, otherwise none
    pub fn detect_boundary(&self, points: &[Point]) -> Option<BoundarySet> {
        if !self.config.preserve_boundary {
            return None;
        }

        info!(mode = %self.config.boundary_mode, "Detecting boundary points");
        let boundary = identify_boundary_points(points, self.config.boundary_mode);
        info!(boundary_points = boundary.len(), "Boundary detected");
        Some(boundary)
    }

    /// Reduce, optionally invert, and return the cloud that will be written
    pub fn transform(&self, original: &[Point], boundary: Option<&BoundarySet>) -> Vec<Point> {
        info!(
            method = %self.config.method,
            target_percentage = self.config.target_percentage,
            "Reducing point density"
        );
        let mut rng = self.config.rng();
        let reduced = reduce_point_cloud(
            original,
            self.config.method,
            self.config.target_percentage,
            boundary,
            &mut rng,
        );
        info!(from = original.len(), to = reduced.len(), "Reduction complete");

        if self.config.invert_elevation {
            info!("Inverting elevation");
            invert_elevation(&reduced)
        } else {
            reduced
        }
    }

    /// Executes the complete pipeline and writes the output plus its report.
    pub fn run(&self) -> Result<ProcessingReport> {
        info!(
            input = %self.input_path.display(),
            output = %self.output_path.display(),
            "Starting point cloud processing"
        );

        let cloud = load_cloud(&self.input_path)?;
        let boundary = self.detect_boundary(&cloud.points);
        let processed = self.transform(&cloud.points, boundary.as_ref());

        write_text(&self.output_path, &processed, self.config.decimal_places)?;
        info!(path = %self.output_path.display(), points = processed.len(), "Saved cloud");

        let report = ProcessingReport {
            input: self.input_path.clone(),
            output: self.output_path.clone(),
            original_points: cloud.points.len(),
            output_points: processed.len(),
            boundary: BoundaryInfo {
                mode: self.config.boundary_mode,
                point_count: boundary.as_ref().map_or(0, |b| b.len()),
                preserved: self.config.preserve_boundary,
            },
            reduction: ReductionInfo {
                method: self.config.method,
                target_percentage: self.config.target_percentage,
                seed: self.config.seed,
            },
            inverted_elevation: self.config.invert_elevation,
            has_colour: cloud.has_colour,
            bounds: cloud.bounds,
        };
        report.write()?;

        info!("Processing complete!");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryMode;
    use crate::reduction::ReductionMethod;

    #[test]
    fn test_detect_colour_samples_leading_points() {
        let mut points = vec![Point::new(0.0, 0.0, 0.0); COLOUR_DETECTION_SAMPLE_SIZE];
        points.push(Point::with_colour(1.0, 1.0, 1.0, 1, 2, 3));
        assert!(!detect_colour_data(&points));

        points[3] = Point::with_colour(0.0, 0.0, 0.0, 4, 5, 6);
        assert!(detect_colour_data(&points));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        let result = PointCloudProcessor::new(
            Path::new("/definitely/not/here.xyz"),
            Path::new("out.xyz"),
            ProcessingConfig::default(),
        );
        assert!(matches!(result, Err(ProcessingError::Io(_))));
    }

    #[test]
    fn test_transform_keeps_boundary_and_inverts() {
        let input = std::env::temp_dir().join("pcp_processor_transform.xyz");
        std::fs::write(&input, "0 0 0\n").unwrap();

        let config = ProcessingConfig {
            boundary_mode: BoundaryMode::Horizontal,
            method: ReductionMethod::Gradient,
            target_percentage: 20.0,
            invert_elevation: true,
            seed: Some(5),
            ..Default::default()
        };
        let processor = PointCloudProcessor::new(&input, &input.with_extension("out"), config).unwrap();

        let mut points: Vec<Point> = (0..25)
            .map(|i| Point::new((i % 5) as f64, (i / 5) as f64, i as f64))
            .collect();
        points.push(Point::new(-10.0, 2.0, 1.0));

        let boundary = processor.detect_boundary(&points).unwrap();
        assert!(boundary.contains(&25));

        let out = processor.transform(&points, Some(&boundary));
        assert!(out.contains(&Point::new(-10.0, 2.0, -1.0)));
        assert!(out.len() >= boundary.len());

        std::fs::remove_file(&input).ok();
    }
}
