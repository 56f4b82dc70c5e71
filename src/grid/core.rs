use std::collections::HashMap;

use serde::Serialize;

use crate::error::{LayoutError, Result};
use crate::geometry::CellRect;
use crate::width::{clean_line, glyph_width};

/// One cell of the art grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Label(char),
    /// Empty space that receives no axis.
    Blank,
}

/// A label together with the inclusive bounding box it fills exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelRegion {
    pub label: char,
    pub bounds: CellRect,
}

/// Validated rectangular grid of cells.
///
/// `labels` is the arena the compiler works over, ordered by the first
/// appearance of each label in row-major order.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Cell>,
    rows: usize,
    cols: usize,
    labels: Vec<LabelRegion>,
}

impl Grid {
    /// Parse free-form art: surrounding whitespace is trimmed and empty
    /// lines are dropped. A whitespace blank marker is never trimmed.
    pub fn parse_art(text: &str, blank: char) -> Result<Self> {
        let lines: Vec<String> = text
            .lines()
            .map(clean_line)
            .map(|line| {
                line.trim_matches(|c: char| c.is_whitespace() && c != blank)
                    .to_string()
            })
            .filter(|line| !line.is_empty())
            .collect();
        Self::parse_lines(&lines, blank)
    }

    /// Parse lines verbatim; every line must have the same number of cells.
    pub fn parse_lines<S: AsRef<str>>(lines: &[S], blank: char) -> Result<Self> {
        let rows: Vec<Vec<char>> = lines
            .iter()
            .map(|line| clean_line(line.as_ref()).chars().collect())
            .collect();

        let Some(first) = rows.first() else {
            return Err(LayoutError::Empty);
        };
        let cols = first.len();
        for (line, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LayoutError::Ragged {
                    line,
                    expected: cols,
                    found: row.len(),
                });
            }
        }
        if cols == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (row, glyphs) in rows.iter().enumerate() {
            for (col, &glyph) in glyphs.iter().enumerate() {
                cells.push(classify(glyph, blank, row, col)?);
            }
        }

        let mut grid = Self {
            cells,
            rows: rows.len(),
            cols,
            labels: Vec::new(),
        };
        grid.labels = grid.collect_regions()?;
        if grid.labels.is_empty() {
            return Err(LayoutError::Empty);
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn bounds(&self) -> CellRect {
        CellRect::full(self.rows, self.cols)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn labels(&self) -> &[LabelRegion] {
        &self.labels
    }

    pub fn region_of(&self, label: char) -> Option<&LabelRegion> {
        self.labels.iter().find(|region| region.label == label)
    }

    fn collect_regions(&self) -> Result<Vec<LabelRegion>> {
        let mut order: Vec<char> = Vec::new();
        let mut boxes: HashMap<char, (CellRect, usize)> = HashMap::new();

        for row in 0..self.rows {
            for col in 0..self.cols {
                let Cell::Label(label) = self.cells[row * self.cols + col] else {
                    continue;
                };
                boxes
                    .entry(label)
                    .and_modify(|(rect, count)| {
                        rect.top = rect.top.min(row);
                        rect.bottom = rect.bottom.max(row);
                        rect.left = rect.left.min(col);
                        rect.right = rect.right.max(col);
                        *count += 1;
                    })
                    .or_insert_with(|| {
                        order.push(label);
                        (CellRect::new(row, col, row, col), 1)
                    });
            }
        }

        let mut regions = Vec::with_capacity(order.len());
        for label in order {
            let (bounds, count) = boxes[&label];
            self.check_solid(label, bounds, count)?;
            regions.push(LabelRegion { label, bounds });
        }
        regions.sort_by_key(|region| (region.bounds.top, region.bounds.left));
        Ok(regions)
    }

    fn check_solid(&self, label: char, bounds: CellRect, count: usize) -> Result<()> {
        for row in bounds.top..=bounds.bottom {
            for col in bounds.left..=bounds.right {
                if self.cells[row * self.cols + col] != Cell::Label(label) {
                    return Err(LayoutError::NonRectangularLabel { label, row, col });
                }
            }
        }
        debug_assert_eq!(count, bounds.area());
        Ok(())
    }
}

fn classify(glyph: char, blank: char, row: usize, col: usize) -> Result<Cell> {
    if glyph == blank {
        Ok(Cell::Blank)
    } else if glyph.is_alphanumeric() && glyph_width(glyph) == 1 {
        Ok(Cell::Label(glyph))
    } else {
        Err(LayoutError::InvalidGlyph { glyph, row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_label_boxes() {
        let grid = Grid::parse_lines(&["113", "223"], '.').unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        let labels: Vec<char> = grid.labels().iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!['1', '3', '2']);
        assert_eq!(grid.region_of('3').unwrap().bounds, CellRect::new(0, 2, 1, 2));
        assert_eq!(grid.region_of('2').unwrap().bounds, CellRect::new(1, 0, 1, 1));
    }

    #[test]
    fn parse_art_trims_and_skips_empty_lines() {
        let grid = Grid::parse_art("\n  aab \n\n  ccb\n", '.').unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
    }

    #[test]
    fn space_blank_survives_trimming() {
        let grid = Grid::parse_art("a \nab\n", ' ').unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        assert_eq!(grid.cell(0, 1), Some(Cell::Blank));
        assert_eq!(grid.region_of('a').unwrap().bounds, CellRect::new(0, 0, 1, 0));

        let grid = Grid::parse_art(" b\nab\n", ' ').unwrap();
        assert_eq!(grid.cell(0, 0), Some(Cell::Blank));
    }

    #[test]
    fn rejects_empty_input() {
        let none: [&str; 0] = [];
        assert!(matches!(Grid::parse_lines(&none, '.'), Err(LayoutError::Empty)));
        assert!(matches!(Grid::parse_lines(&["", ""], '.'), Err(LayoutError::Empty)));
        assert!(matches!(Grid::parse_art("\n\n", '.'), Err(LayoutError::Empty)));
        assert!(matches!(Grid::parse_lines(&["..", ".."], '.'), Err(LayoutError::Empty)));
    }

    #[test]
    fn rejects_ragged_lines() {
        let err = Grid::parse_lines(&["aab", "cc"], '.').unwrap_err();
        assert!(matches!(
            err,
            LayoutError::Ragged {
                line: 1,
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn rejects_non_rectangular_label() {
        let err = Grid::parse_lines(&["12", "21"], '.').unwrap_err();
        assert!(matches!(
            err,
            LayoutError::NonRectangularLabel {
                label: '1',
                row: 0,
                col: 1
            }
        ));
    }

    #[test]
    fn rejects_gap_inside_label() {
        let err = Grid::parse_lines(&["a.a"], '.').unwrap_err();
        assert!(matches!(
            err,
            LayoutError::NonRectangularLabel {
                label: 'a',
                row: 0,
                col: 1
            }
        ));
    }

    #[test]
    fn rejects_punctuation_and_wide_glyphs() {
        assert!(matches!(
            Grid::parse_lines(&["a#"], '.'),
            Err(LayoutError::InvalidGlyph {
                glyph: '#',
                row: 0,
                col: 1
            })
        ));
        assert!(matches!(
            Grid::parse_lines(&["a界"], '.'),
            Err(LayoutError::InvalidGlyph { glyph: '界', .. })
        ));
    }

    #[test]
    fn blank_cells_are_not_labels() {
        let grid = Grid::parse_lines(&["a.", "a."], '.').unwrap();
        assert_eq!(grid.labels().len(), 1);
        assert_eq!(grid.cell(0, 1), Some(Cell::Blank));
        assert_eq!(grid.cell(2, 0), None);
    }

    #[test]
    fn ansi_colours_are_ignored() {
        let grid = Grid::parse_lines(&["\u{1b}[32mab\u{1b}[0m"], '.').unwrap();
        assert_eq!(grid.cols(), 2);
    }
}
