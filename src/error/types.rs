use thiserror::Error;

use crate::geometry::CellRect;

/// Unified result type for the layout compiler.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced while parsing, compiling or emitting a layout.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("ascii-art has no rows or no columns")]
    Empty,
    #[error("line {line} has {found} cells, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("label `{label}` is not a solid rectangle (cell {row},{col} breaks it)")]
    NonRectangularLabel { label: char, row: usize, col: usize },
    #[error("labels `{labels}` in {region} cannot be separated by full-span cuts")]
    AmbiguousLayout { labels: String, region: CellRect },
    #[error("glyph {glyph:?} at cell {row},{col} is not a valid label")]
    InvalidGlyph { glyph: char, row: usize, col: usize },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot replay source line {line}: {message}")]
    Replay { line: usize, message: String },
    #[error("graphics backend error: {0}")]
    Backend(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Invalid values in a [`crate::LayoutConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{field}` must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`{field}` must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("blank marker {0:?} must be a single-cell, non-alphanumeric glyph")]
    BlankMarker(char),
    #[error("invalid configuration document: {0}")]
    Parse(String),
}
