use std::fmt;

use serde::Serialize;

/// Inclusive rectangle of character cells inside the ascii-art grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl CellRect {
    pub const fn new(top: usize, left: usize, bottom: usize, right: usize) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    /// Region covering a whole `rows` x `cols` grid. Both must be non-zero.
    pub const fn full(rows: usize, cols: usize) -> Self {
        Self::new(0, 0, rows - 1, cols - 1)
    }

    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    pub fn contains_cell(&self, row: usize, col: usize) -> bool {
        (self.top..=self.bottom).contains(&row) && (self.left..=self.right).contains(&col)
    }

    pub fn contains(&self, other: &CellRect) -> bool {
        self.top <= other.top
            && self.left <= other.left
            && other.bottom <= self.bottom
            && other.right <= self.right
    }

    /// Same rows, column range `left..=right`.
    pub fn with_cols(&self, left: usize, right: usize) -> Self {
        Self::new(self.top, left, self.bottom, right)
    }

    /// Same columns, row range `top..=bottom`.
    pub fn with_rows(&self, top: usize, bottom: usize) -> Self {
        Self::new(top, self.left, bottom, self.right)
    }
}

impl fmt::Display for CellRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows {}..={} cols {}..={}",
            self.top, self.bottom, self.left, self.right
        )
    }
}

/// Box in figure-fraction coordinates, origin at the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FigureBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl FigureBox {
    pub const fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Figure size in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FigureSize {
    pub width: f64,
    pub height: f64,
}

impl FigureSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}
