/// Point loading from text and LAS/LAZ files
use crate::error::Result;
use crate::point::{Colour, Point};
use constants::io::{COMMENT_PREFIXES, LAS_EXTENSIONS};
use constants::processing::{PARALLEL_CHUNK_SIZE, PROGRESS_UPDATE_INTERVAL};
use indicatif::ProgressBar;
use las::Reader;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Parse a colour channel, rounding and clamping to 0-255
fn parse_channel(field: &str) -> Option<u8> {
    let value: f64 = field.parse().ok()?;
    value
        .is_finite()
        .then(|| value.round().clamp(0.0, 255.0) as u8)
}

/// Parse a single `x y z [r g b]` line.
/// Fields may be separated by whitespace or commas. Returns `None` for
/// comments, blank lines, lines without three numeric coordinates and
/// non-finite coordinates.
pub fn parse_line(line: &str) -> Option<Point> {
    let line = line.trim();
    if line.is_empty() || COMMENT_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return None;
    }

    let mut fields = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|field| !field.is_empty());

    let mut coordinate = || -> Option<f64> {
        let value: f64 = fields.next()?.parse().ok()?;
        value.is_finite().then_some(value)
    };
    let (x, y, z) = (coordinate()?, coordinate()?, coordinate()?);

    let mut channel = || fields.next().and_then(parse_channel);
    let colour = Colour::from_channels(channel(), channel(), channel());

    Some(Point { x, y, z, colour })
}

/// Parse every line of a text cloud in parallel, preserving line order
pub fn parse_points(text: &str, progress: &ProgressBar) -> Vec<Point> {
    let lines: Vec<&str> = text.lines().collect();
    progress.set_length(lines.len() as u64);

    let chunks: Vec<Vec<Point>> = lines
        .par_chunks(PARALLEL_CHUNK_SIZE)
        .map(|chunk| {
            let points: Vec<Point> = chunk.iter().filter_map(|line| parse_line(line)).collect();
            progress.inc(chunk.len() as u64);
            points
        })
        .collect();

    let points = chunks.concat();
    debug!(lines = lines.len(), points = points.len(), "Parsed text cloud");
    points
}

/// Create LAS file reader for point cloud access.
/// Handles both .las and .laz compressed formats.
pub fn create_reader(file_path: &Path) -> Result<Reader> {
    let file = File::open(file_path)?;
    let buf_reader = BufReader::new(file);
    Ok(Reader::new(buf_reader)?)
}

/// Read a LAS/LAZ file.
/// 16-bit colour is scaled down to 8 bits unless every channel already fits.
pub fn load_las(file_path: &Path, progress: &ProgressBar) -> Result<Vec<Point>> {
    let mut reader = create_reader(file_path)?;
    let total_points = reader.header().number_of_points() as usize;
    progress.set_length(total_points as u64);

    let mut raw = Vec::with_capacity(total_points);
    let mut widest_channel = 0u16;
    for (idx, point_result) in reader.points().enumerate() {
        let point = point_result?;
        let colour = point.color.map(|c| (c.red, c.green, c.blue));
        if let Some((r, g, b)) = colour {
            widest_channel = widest_channel.max(r).max(g).max(b);
        }
        raw.push((point.x, point.y, point.z, colour));

        if idx % PROGRESS_UPDATE_INTERVAL == 0 {
            progress.set_position(idx as u64);
        }
    }
    progress.set_position(raw.len() as u64);

    let shift = if widest_channel > u16::from(u8::MAX) { 8 } else { 0 };
    debug!(points = raw.len(), colour_shift = shift, "Read LAS cloud");

    Ok(raw
        .into_iter()
        .map(|(x, y, z, colour)| match colour {
            Some((r, g, b)) => {
                Point::with_colour(x, y, z, (r >> shift) as u8, (g >> shift) as u8, (b >> shift) as u8)
            }
            None => Point::new(x, y, z),
        })
        .collect())
}

/// Whether `path` should be read with the LAS reader
pub fn is_las_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| LAS_EXTENSIONS.contains(&ext.as_str()))
}

/// Load points from `path`, picking the reader by extension.
/// Anything that is not .las/.laz is parsed as text.
pub fn load_points(path: &Path, progress: &ProgressBar) -> Result<Vec<Point>> {
    if is_las_path(path) {
        load_las(path, progress)
    } else {
        let text = fs::read_to_string(path)?;
        Ok(parse_points(&text, progress))
    }
}
