/// Processing report written next to the exported cloud
use crate::boundary::BoundaryMode;
use crate::bounds::PointCloudBounds;
use crate::error::Result;
use crate::reduction::ReductionMethod;
use constants::io::REPORT_SUFFIX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Points loaded from the input file.
    pub original_points: usize,
    /// Points written to the output file.
    pub output_points: usize,
    pub boundary: BoundaryInfo,
    pub reduction: ReductionInfo,
    pub inverted_elevation: bool,
    pub has_colour: bool,
    /// Bounds of the original cloud, before any transform.
    pub bounds: PointCloudBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryInfo {
    pub mode: BoundaryMode,
    pub point_count: usize,
    pub preserved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionInfo {
    pub method: ReductionMethod,
    pub target_percentage: f64,
    pub seed: Option<u64>,
}

/// Report path for an output file: `<output>.report.json`
pub fn report_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    name.push('.');
    name.push_str(REPORT_SUFFIX);
    output.with_file_name(name)
}

impl ProcessingReport {
    /// Write the report as pretty JSON and return where it went.
    pub fn write(&self) -> Result<PathBuf> {
        let path = report_path(&self.output);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;

        info!(path = %path.display(), "Generated processing report");
        self.log_summary();
        Ok(path)
    }

    /// Log report summary for verification and debugging.
    fn log_summary(&self) {
        let kept = if self.original_points > 0 {
            self.output_points as f64 / self.original_points as f64 * 100.0
        } else {
            0.0
        };
        info!(
            original = self.original_points,
            output = self.output_points,
            kept_percent = %format!("{kept:.1}"),
            "Point counts"
        );
        info!(
            mode = %self.boundary.mode,
            boundary_points = self.boundary.point_count,
            preserved = self.boundary.preserved,
            "Boundary"
        );
        info!(
            x = %format!("{:.2} to {:.2}", self.bounds.min_x, self.bounds.max_x),
            y = %format!("{:.2} to {:.2}", self.bounds.min_y, self.bounds.max_y),
            z = %format!("{:.2} to {:.2}", self.bounds.min_z, self.bounds.max_z),
            "Original bounds"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path_appends_suffix() {
        assert_eq!(
            report_path(Path::new("out/reduced.xyz")),
            PathBuf::from("out/reduced.xyz.report.json")
        );
    }

    #[test]
    fn test_report_json_shape() {
        let report = ProcessingReport {
            input: PathBuf::from("in.xyz"),
            output: PathBuf::from("out.xyz"),
            original_points: 10,
            output_points: 4,
            boundary: BoundaryInfo {
                mode: BoundaryMode::Volumetric,
                point_count: 3,
                preserved: true,
            },
            reduction: ReductionInfo {
                method: ReductionMethod::Voxel,
                target_percentage: 40.0,
                seed: None,
            },
            inverted_elevation: false,
            has_colour: true,
            bounds: PointCloudBounds::new(),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["boundary"]["mode"], "volumetric");
        assert_eq!(value["reduction"]["method"], "voxel");
        assert_eq!(value["output_points"], 4);
    }
}
