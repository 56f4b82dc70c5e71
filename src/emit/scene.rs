//! Retained-mode reference backend.
//!
//! Computes figure-fraction boxes the way matplotlib's `GridSpec` does,
//! without touching any real graphics library.

use crate::error::{LayoutError, Result};
use crate::geometry::{FigureBox, FigureSize};

use super::{GraphicsBackend, GridRequest};

/// Library spacing used when a grid leaves `wspace`/`hspace` unset.
const DEFAULT_SPACE: f64 = 0.2;

/// Figure margins in figure-fraction coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubplotParams {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for SubplotParams {
    fn default() -> Self {
        Self {
            left: 0.125,
            right: 0.9,
            bottom: 0.11,
            top: 0.88,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneFigure {
    pub size: FigureSize,
    pub dpi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AxisHandle(usize);

#[derive(Debug, Clone)]
struct SceneGrid {
    bounds: FigureBox,
    request: GridRequest,
}

/// In-memory graphics context recording every grid and axis.
#[derive(Debug, Default)]
pub struct SceneBackend {
    params: SubplotParams,
    figures: Vec<SceneFigure>,
    grids: Vec<SceneGrid>,
    axes: Vec<FigureBox>,
}

impl SceneBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: SubplotParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn axis_box(&self, axis: AxisHandle) -> Option<FigureBox> {
        self.axes.get(axis.0).copied()
    }

    pub fn grid_box(&self, grid: GridHandle) -> Option<FigureBox> {
        self.grids.get(grid.0).map(|grid| grid.bounds)
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn figures(&self) -> &[SceneFigure] {
        &self.figures
    }

    fn outer_box(&self) -> FigureBox {
        let SubplotParams {
            left,
            right,
            bottom,
            top,
        } = self.params;
        FigureBox::new(left, bottom, right, top)
    }

    fn placement_box(&self, parent: Option<(&GridHandle, usize)>) -> Result<FigureBox> {
        let Some((handle, index)) = parent else {
            return Ok(self.outer_box());
        };
        let grid = self
            .grids
            .get(handle.0)
            .ok_or_else(|| LayoutError::Backend(format!("unknown grid handle {}", handle.0)))?;
        cell_box(grid, index)
    }
}

/// Box of cell `index` (row-major) inside `grid`.
fn cell_box(grid: &SceneGrid, index: usize) -> Result<FigureBox> {
    let request = &grid.request;
    if index >= request.nrows * request.ncols {
        return Err(LayoutError::Backend(format!(
            "cell {index} outside a {}x{} grid",
            request.nrows, request.ncols
        )));
    }
    let (row, col) = (index / request.ncols, index % request.ncols);

    let bounds = grid.bounds;
    let rows = track_offsets(
        bounds.height(),
        &request.height_ratios,
        request.hspace.unwrap_or(DEFAULT_SPACE),
    );
    let cols = track_offsets(
        bounds.width(),
        &request.width_ratios,
        request.wspace.unwrap_or(DEFAULT_SPACE),
    );

    let (row_start, row_end) = rows[row];
    let (col_start, col_end) = cols[col];
    Ok(FigureBox::new(
        bounds.left + col_start,
        bounds.top - row_end,
        bounds.left + col_end,
        bounds.top - row_start,
    ))
}

/// Start and end offset of each track along a span of `total`.
///
/// Tracks are separated by `space` times the average track size and share
/// the rest in proportion to `ratios`.
fn track_offsets(total: f64, ratios: &[usize], space: f64) -> Vec<(f64, f64)> {
    let count = ratios.len() as f64;
    let cell = total / (count + space * (count - 1.0));
    let separator = space * cell;
    let ratio_sum: usize = ratios.iter().sum();
    let norm = cell * count / ratio_sum as f64;

    let mut offsets = Vec::with_capacity(ratios.len());
    let mut cursor = 0.0;
    for (idx, &ratio) in ratios.iter().enumerate() {
        if idx > 0 {
            cursor += separator;
        }
        let start = cursor;
        cursor += ratio as f64 * norm;
        offsets.push((start, cursor));
    }
    offsets
}

impl GraphicsBackend for SceneBackend {
    type Figure = SceneFigure;
    type Grid = GridHandle;
    type Axis = AxisHandle;

    fn figure(&mut self, size: FigureSize, dpi: f64) -> Result<SceneFigure> {
        let figure = SceneFigure { size, dpi };
        self.figures.push(figure);
        Ok(figure)
    }

    fn grid(
        &mut self,
        _figure: &SceneFigure,
        parent: Option<(&GridHandle, usize)>,
        request: &GridRequest,
    ) -> Result<GridHandle> {
        if request.height_ratios.len() != request.nrows
            || request.width_ratios.len() != request.ncols
            || request.height_ratios.contains(&0)
            || request.width_ratios.contains(&0)
        {
            return Err(LayoutError::Backend(format!(
                "ratios {:?}/{:?} do not fit a {}x{} grid",
                request.height_ratios, request.width_ratios, request.nrows, request.ncols
            )));
        }
        let bounds = self.placement_box(parent)?;
        self.grids.push(SceneGrid {
            bounds,
            request: request.clone(),
        });
        Ok(GridHandle(self.grids.len() - 1))
    }

    fn axis(
        &mut self,
        _figure: &SceneFigure,
        parent: Option<(&GridHandle, usize)>,
    ) -> Result<AxisHandle> {
        let bounds = self.placement_box(parent)?;
        self.axes.push(bounds);
        Ok(AxisHandle(self.axes.len() - 1))
    }
}
