/// Line-oriented text export
use crate::error::{ProcessingError, Result};
use crate::point::Point;
use constants::io::LAS_EXTENSIONS;
use std::fs;
use std::path::Path;

/// Format one point as `x y z [r g b]` with fixed precision
fn format_point(out: &mut String, point: &Point, decimal_places: usize) {
    out.push_str(&format!(
        "{:.prec$} {:.prec$} {:.prec$}",
        point.x,
        point.y,
        point.z,
        prec = decimal_places
    ));
    if let Some((r, g, b)) = point.colour.rgb() {
        out.push_str(&format!(" {r} {g} {b}"));
    }
}

/// Serialise points one per line.
/// Colour is written per point, so mixed clouds produce mixed line widths.
pub fn export_to_text(points: &[Point], decimal_places: usize) -> String {
    let mut out = String::with_capacity(points.len() * (3 * (decimal_places + 6) + 12));
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        format_point(&mut out, point, decimal_places);
    }
    out
}

/// Write points to a text file.
/// LAS output is not produced, those extensions are rejected.
pub fn write_text(path: &Path, points: &[Point], decimal_places: usize) -> Result<()> {
    if let Some(extension) = path.extension() {
        let ext_str = extension.to_string_lossy().to_lowercase();
        if LAS_EXTENSIONS.contains(&ext_str.as_str()) {
            return Err(ProcessingError::UnsupportedFormat(format!(
                "cannot write .{ext_str} output, use a text extension"
            )));
        }
    }

    let mut text = export_to_text(points, decimal_places);
    if !text.is_empty() {
        text.push('\n');
    }
    fs::write(path, text)?;
    Ok(())
}
