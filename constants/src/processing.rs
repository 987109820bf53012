/// Points per chunk for parallel bounds calculation
pub const PARALLEL_CHUNK_SIZE: usize = 25_000;

/// Update the loading progress bar every this many points
pub const PROGRESS_UPDATE_INTERVAL: usize = 50_000;

/// Progress bar layout used while loading points
pub const PROGRESS_TEMPLATE: &str = "[{bar:40.cyan/blue}] {pos}/{len} points ({percent}%) {msg}";

/// Progress bar fill characters
pub const PROGRESS_CHARS: &str = "▉▊▋▌▍▎▏ ";
