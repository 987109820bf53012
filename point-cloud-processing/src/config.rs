/// Processing configuration loaded from JSON and overridden from the command line
use crate::boundary::BoundaryMode;
use crate::error::{ProcessingError, Result};
use crate::reduction::ReductionMethod;
use constants::io::{DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
use constants::reduction::FULL_PERCENTAGE;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Hull policy used for boundary detection.
    pub boundary_mode: BoundaryMode,
    /// Keep boundary points through reduction regardless of percentage.
    pub preserve_boundary: bool,
    pub method: ReductionMethod,
    /// Share of the original points to keep, in (0, 100].
    pub target_percentage: f64,
    /// Negate z on the output cloud.
    pub invert_elevation: bool,
    /// Fixed precision of exported coordinates.
    pub decimal_places: usize,
    /// Seed for gradient sampling. Absent means a fresh entropy seed per run.
    pub seed: Option<u64>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            boundary_mode: BoundaryMode::Horizontal,
            preserve_boundary: true,
            method: ReductionMethod::Voxel,
            target_percentage: 50.0,
            invert_elevation: false,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            seed: None,
        }
    }
}

impl ProcessingConfig {
    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Check caller-side limits before anything runs.
    /// Percentages above 100 are clamped rather than rejected.
    pub fn validate(mut self) -> Result<Self> {
        if !self.target_percentage.is_finite() || self.target_percentage <= 0.0 {
            return Err(ProcessingError::InvalidPercentage(self.target_percentage));
        }
        if self.target_percentage > FULL_PERCENTAGE {
            warn!(
                requested = self.target_percentage,
                "Target percentage above 100, clamping"
            );
            self.target_percentage = FULL_PERCENTAGE;
        }
        if self.decimal_places > MAX_DECIMAL_PLACES {
            return Err(ProcessingError::InvalidDecimalPlaces(
                self.decimal_places,
                MAX_DECIMAL_PLACES,
            ));
        }
        Ok(self)
    }

    /// Random source for the reduction stage
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ProcessingConfig =
            serde_json::from_str(r#"{"method": "gradient", "target_percentage": 20}"#).unwrap();
        assert_eq!(config.method, ReductionMethod::Gradient);
        assert_eq!(config.target_percentage, 20.0);
        assert_eq!(config.boundary_mode, BoundaryMode::Horizontal);
        assert!(config.preserve_boundary);
        assert_eq!(config.decimal_places, 6);
    }

    #[test]
    fn test_unknown_method_in_json_is_identity() {
        let config: ProcessingConfig =
            serde_json::from_str(r#"{"method": "octree", "boundary_mode": "volumetric"}"#).unwrap();
        assert_eq!(config.method, ReductionMethod::Identity);
        assert_eq!(config.boundary_mode, BoundaryMode::Volumetric);
    }

    #[test]
    fn test_validation() {
        let clamped = ProcessingConfig {
            target_percentage: 250.0,
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(clamped.target_percentage, 100.0);

        for bad in [0.0, -5.0, f64::NAN] {
            let config = ProcessingConfig {
                target_percentage: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ProcessingError::InvalidPercentage(_))
            ));
        }

        let too_precise = ProcessingConfig {
            decimal_places: 40,
            ..Default::default()
        };
        assert!(matches!(
            too_precise.validate(),
            Err(ProcessingError::InvalidDecimalPlaces(40, 15))
        ));
    }

    #[test]
    fn test_seeded_rng_is_repeatable() {
        let config = ProcessingConfig {
            seed: Some(123),
            ..Default::default()
        };
        let a: u64 = config.rng().r#gen();
        let b: u64 = config.rng().r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = ProcessingConfig {
            boundary_mode: BoundaryMode::Volumetric,
            method: ReductionMethod::Gradient,
            seed: Some(9),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"gradient\""));
        assert_eq!(serde_json::from_str::<ProcessingConfig>(&json).unwrap(), config);
    }
}
