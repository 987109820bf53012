/// Shared tuning constants for point cloud processing
pub mod boundary;
pub mod io;
pub mod processing;
pub mod reduction;
