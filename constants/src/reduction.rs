/// Exponent applied to (100 / percentage) when deriving the voxel scale factor
pub const VOXEL_SCALE_EXPONENT: f64 = 1.5;

/// Bias subtracted from the voxel scale factor so high percentages barely reduce
pub const VOXEL_SCALE_BIAS: f64 = 0.98;

/// Lower bound on the biased scale factor, keeps voxels from collapsing to zero size
pub const MIN_VOXEL_SCALE: f64 = 0.001;

/// Random neighbours drawn per point when estimating the local gradient
pub const GRADIENT_SAMPLE_COUNT: usize = 10;

/// Only neighbours closer than this horizontal distance contribute to the gradient
pub const GRADIENT_NEIGHBOUR_RADIUS: f64 = 10.0;

/// Percentage at or above which reduction returns the input unchanged
pub const FULL_PERCENTAGE: f64 = 100.0;
