// Error types for loading voxel bodies.
//
// Only loading can fail. Destruction, search and meshing outcomes are plain
// data ("separated" and "connected" are both valid answers), and missing
// neighbors are an ordinary open-to-space state.

use crate::types::VoxelCoord;
use thiserror::Error;

/// Errors from parsing the point-cloud text format. Line numbers are
/// 1-based and refer to the whole input, header included.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The input never contained an `end_header` line.
    #[error("missing end_header line")]
    MissingHeaderEnd,

    /// A data line had fewer than the six expected fields.
    #[error("line {line}: expected at least 6 fields (x y z r g b), found {found}")]
    FieldCount { line: usize, found: usize },

    /// A coordinate field was not a finite decimal number in `i32` range.
    #[error("line {line}: invalid coordinate {value:?}")]
    InvalidCoordinate { line: usize, value: String },

    /// A color field was not an integer in 0..=255.
    #[error("line {line}: invalid color channel {value:?}")]
    InvalidColor { line: usize, value: String },

    /// Two data lines mapped to the same lattice position.
    #[error("line {line}: duplicate voxel at {coord}")]
    DuplicatePosition { line: usize, coord: VoxelCoord },
}

/// Errors from loading a body from disk.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read voxel source: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed voxel source: {0}")]
    Source(#[from] SourceError),
}
