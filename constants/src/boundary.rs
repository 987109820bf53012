/// Relative tolerance for hull plane and line tests, scaled by the cloud diagonal
pub const HULL_RELATIVE_TOLERANCE: f64 = 1e-9;

/// Minimum |n1 · (n2 × n3)| between unit face normals for a hull vertex to count as a corner
pub const CORNER_NORMAL_TOLERANCE: f64 = 1e-10;

/// Fewer points than this form a degenerate 2D hull where every point is on the boundary
pub const MIN_HORIZONTAL_HULL_POINTS: usize = 3;

/// Fewer distinct positions than this cannot span a volume
pub const MIN_VOLUMETRIC_HULL_POINTS: usize = 4;
