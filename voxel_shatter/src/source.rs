// Point-cloud text source parsing.
//
// The source format is an ASCII point list with a free-form header. Every
// line up to and including the first one containing `end_header` is
// skipped. Each following non-blank line holds at least six
// whitespace-separated fields:
//
//   x y z r g b [ignored...]
//
// The source uses a different handedness and up axis than the lattice, so
// the position is remapped to `(-x, z, -y)`. Coordinates are decimal
// numbers rounded to the nearest lattice cell; colors are 0..=255 with
// alpha fixed at 255.
//
// Any malformed field fails the whole parse with the offending line number.
// Nothing is silently skipped except blank lines and trailing extra fields.

use crate::error::{LoadError, SourceError};
use crate::types::{Rgba, VoxelCoord};
use rustc_hash::FxHashSet;
use std::path::Path;

const HEADER_END: &str = "end_header";

/// Parse a point-cloud text into `(position, color)` pairs, in file order.
pub fn parse_source(text: &str) -> Result<Vec<(VoxelCoord, Rgba)>, SourceError> {
    let mut lines = text.lines().enumerate();
    if !lines.any(|(_, line)| line.contains(HEADER_END)) {
        return Err(SourceError::MissingHeaderEnd);
    }

    let mut cells = Vec::new();
    let mut seen = FxHashSet::default();
    for (i, line) in lines {
        let line_no = i + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 6 {
            return Err(SourceError::FieldCount {
                line: line_no,
                found: fields.len(),
            });
        }

        let sx = parse_coordinate(fields[0], line_no)?;
        let sy = parse_coordinate(fields[1], line_no)?;
        let sz = parse_coordinate(fields[2], line_no)?;
        let coord = VoxelCoord::new(-sx, sz, -sy);

        let color = Rgba::opaque(
            parse_channel(fields[3], line_no)?,
            parse_channel(fields[4], line_no)?,
            parse_channel(fields[5], line_no)?,
        );

        if !seen.insert(coord) {
            return Err(SourceError::DuplicatePosition {
                line: line_no,
                coord,
            });
        }
        cells.push((coord, color));
    }

    Ok(cells)
}

/// Read and parse a point-cloud file.
pub fn load_source_file(path: impl AsRef<Path>) -> Result<Vec<(VoxelCoord, Rgba)>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_source(&text)?)
}

fn parse_coordinate(field: &str, line: usize) -> Result<i32, SourceError> {
    let invalid = || SourceError::InvalidCoordinate {
        line,
        value: field.to_string(),
    };
    let value: f64 = field.parse().map_err(|_| invalid())?;
    let rounded = value.round();
    // Negation of i32::MIN overflows, so the range is symmetric.
    if !rounded.is_finite() || rounded.abs() > f64::from(i32::MAX) {
        return Err(invalid());
    }
    Ok(rounded as i32)
}

fn parse_channel(field: &str, line: usize) -> Result<u8, SourceError> {
    field.parse().map_err(|_| SourceError::InvalidColor {
        line,
        value: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ply\nformat ascii 1.0\nelement vertex 2\nend_header\n";

    #[test]
    fn parses_points_after_header() {
        let text = format!("{HEADER}1 2 3 10 20 30\n0 0 0 255 255 255\n");
        let cells = parse_source(&text).unwrap();
        assert_eq!(cells.len(), 2);
        // (x, y, z) -> (-x, z, -y)
        assert_eq!(cells[0].0, VoxelCoord::new(-1, 3, -2));
        assert_eq!(cells[0].1, Rgba::opaque(10, 20, 30));
        assert_eq!(cells[1].0, VoxelCoord::new(0, 0, 0));
    }

    #[test]
    fn decimal_coordinates_round_to_lattice() {
        let text = format!("{HEADER}1.0 -2.0 0.4 0 0 0\n2.6 0 0 0 0 0\n");
        let cells = parse_source(&text).unwrap();
        assert_eq!(cells[0].0, VoxelCoord::new(-1, 0, 2));
        assert_eq!(cells[1].0, VoxelCoord::new(-3, 0, 0));
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let text = "end_header\r\n\r\n1 0 0 1 2 3\r\n\n";
        let cells = parse_source(text).unwrap();
        assert_eq!(cells, vec![(VoxelCoord::new(-1, 0, 0), Rgba::opaque(1, 2, 3))]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let text = "end_header\n0 0 0 1 2 3 128\n";
        let cells = parse_source(text).unwrap();
        assert_eq!(cells[0].1, Rgba::opaque(1, 2, 3));
    }

    #[test]
    fn missing_header_end_is_an_error() {
        assert_eq!(
            parse_source("ply\n0 0 0 1 2 3\n"),
            Err(SourceError::MissingHeaderEnd)
        );
    }

    #[test]
    fn short_line_reports_line_number() {
        let text = "end_header\n0 0 0 1 2 3\n1 1 1 5\n";
        assert_eq!(
            parse_source(text),
            Err(SourceError::FieldCount { line: 3, found: 4 })
        );
    }

    #[test]
    fn malformed_coordinate_fails() {
        let text = "end_header\n0 abc 0 1 2 3\n";
        assert!(matches!(
            parse_source(text),
            Err(SourceError::InvalidCoordinate { line: 2, .. })
        ));
        let text = "end_header\n0 inf 0 1 2 3\n";
        assert!(matches!(
            parse_source(text),
            Err(SourceError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn out_of_range_color_fails() {
        let text = "end_header\n0 0 0 1 256 3\n";
        assert!(matches!(
            parse_source(text),
            Err(SourceError::InvalidColor { line: 2, .. })
        ));
        let text = "end_header\n0 0 0 1 -1 3\n";
        assert!(parse_source(text).is_err());
    }

    #[test]
    fn duplicate_position_fails() {
        let text = "end_header\n1 2 3 0 0 0\n1.2 2 3 9 9 9\n";
        assert_eq!(
            parse_source(text),
            Err(SourceError::DuplicatePosition {
                line: 3,
                coord: VoxelCoord::new(-1, 3, -2),
            })
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_source_file("/nonexistent/voxel_shatter/none.ply").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
