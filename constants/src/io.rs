/// Default fixed decimal precision for exported coordinates
pub const DEFAULT_DECIMAL_PLACES: usize = 6;

/// Highest decimal precision an f64 can meaningfully carry in text
pub const MAX_DECIMAL_PLACES: usize = 15;

/// Line prefixes treated as comments by the text parser
pub const COMMENT_PREFIXES: &[&str] = &["#", "//"];

/// Sample size for colour detection
pub const COLOUR_DETECTION_SAMPLE_SIZE: usize = 100;

/// Extensions read through the LAS reader, everything else is parsed as text
pub const LAS_EXTENSIONS: &[&str] = &["las", "laz"];

/// Suffix appended to the output path for the processing report
pub const REPORT_SUFFIX: &str = "report.json";
