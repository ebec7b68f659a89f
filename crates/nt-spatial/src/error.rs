//! Spatial-subsystem error type.

use thiserror::Error;

use nt_core::Cell;

/// Errors produced by `nt-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("grid has no rows or no columns")]
    EmptyGrid,

    #[error("row {row} has {got} tiles, expected {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },

    #[error("unknown tile glyph {glyph:?} at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },

    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),

    #[error("zone {0:?} has zero width or height")]
    EmptyZone(String),

    #[error("unknown zone category {0:?}")]
    UnknownCategory(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
