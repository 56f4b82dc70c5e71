//! Execute generated source against a backend.
//!
//! Only the statement forms [`super::generate_source`] writes are understood;
//! anything else is rejected with the offending line number.

use std::collections::BTreeMap;

use crate::error::{LayoutError, Result};
use crate::geometry::FigureSize;
use crate::naming::{NameAllocator, NodeId};

use super::materialize::resolve_parent;
use super::{GraphicsBackend, GridRequest, LayoutBundle, Slot};

const IGNORED: [&str; 3] = ["gridspecs = {}", "axes = {}", "for name, ax in axes.items():"];

/// The only indented statement allowed outside a gridspec block.
const ANNOTATE_BODY: &str = "ax.annotate(name, (0.5, 0.5), ha=\"center\", va=\"center\")";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    Figure,
    Cell { grid: NodeId, index: usize },
}

impl Placement {
    fn slot(&self) -> Slot<'_> {
        match self {
            Placement::Figure => Slot::Figure,
            Placement::Cell { grid, index } => Slot::Cell {
                grid: grid.as_str(),
                index: *index,
            },
        }
    }
}

#[derive(Debug, Default)]
struct PendingGrid {
    id: NodeId,
    placement: Option<Placement>,
    nrows: Option<usize>,
    ncols: Option<usize>,
    height_ratios: Option<Vec<usize>>,
    width_ratios: Option<Vec<usize>>,
    wspace: Option<f64>,
    hspace: Option<f64>,
}

struct Replayer<'a, B: GraphicsBackend> {
    backend: &'a mut B,
    figure: Option<B::Figure>,
    axes: BTreeMap<char, B::Axis>,
    grids: BTreeMap<NodeId, B::Grid>,
}

/// Rebuild the layout described by generated `source` on `backend`.
pub fn replay_source<B: GraphicsBackend>(source: &str, backend: &mut B) -> Result<LayoutBundle<B>> {
    let mut replayer = Replayer {
        backend,
        figure: None,
        axes: BTreeMap::new(),
        grids: BTreeMap::new(),
    };
    let mut pending: Option<(usize, PendingGrid)> = None;

    for (offset, raw) in source.lines().enumerate() {
        let line_no = offset + 1;
        let fail = |message: String| LayoutError::Replay {
            line: line_no,
            message,
        };
        let line = raw.trim();

        if let Some((start, mut grid)) = pending.take() {
            if line == ")" {
                replayer.build_grid(grid).map_err(|err| match err {
                    LayoutError::Backend(message) => LayoutError::Replay {
                        line: start,
                        message,
                    },
                    other => other,
                })?;
            } else {
                apply_argument(&mut grid, line).map_err(fail)?;
                pending = Some((start, grid));
            }
            continue;
        }

        if raw.starts_with(char::is_whitespace) && !line.is_empty() {
            if line == ANNOTATE_BODY {
                continue;
            }
            return Err(fail(format!("unexpected indented statement `{line}`")));
        }
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with("import ")
            || IGNORED.contains(&line)
        {
            continue;
        }

        if let Some(rest) = line.strip_prefix("fig = plt.figure(") {
            let (size, dpi) = parse_figure(rest).map_err(fail)?;
            let figure = replayer.backend.figure(size, dpi)?;
            replayer.figure = Some(figure);
        } else if let Some(rest) = line.strip_prefix("gridspecs[\"") {
            let grid = parse_grid_header(rest).map_err(fail)?;
            pending = Some((line_no, grid));
        } else if let Some(rest) = line.strip_prefix("axes[\"") {
            let (label, placement) = parse_axis(rest).map_err(fail)?;
            replayer.build_axis(label, &placement).map_err(|err| match err {
                LayoutError::Backend(message) => fail(message),
                other => other,
            })?;
        } else {
            return Err(fail(format!("unrecognised statement `{line}`")));
        }
    }

    if let Some((start, grid)) = pending {
        return Err(LayoutError::Replay {
            line: start,
            message: format!("gridspec `{}` is never closed", grid.id),
        });
    }
    replayer.finish()
}

impl<B: GraphicsBackend> Replayer<'_, B> {
    fn build_grid(&mut self, pending: PendingGrid) -> Result<()> {
        let missing = |field: &str| {
            LayoutError::Backend(format!("gridspec `{}` has no {field}", pending.id))
        };
        let request = GridRequest {
            nrows: pending.nrows.ok_or_else(|| missing("nrows"))?,
            ncols: pending.ncols.ok_or_else(|| missing("ncols"))?,
            height_ratios: pending
                .height_ratios
                .clone()
                .ok_or_else(|| missing("height_ratios"))?,
            width_ratios: pending
                .width_ratios
                .clone()
                .ok_or_else(|| missing("width_ratios"))?,
            wspace: pending.wspace,
            hspace: pending.hspace,
        };
        let placement = pending.placement.clone().ok_or_else(|| missing("placement"))?;

        let figure = self
            .figure
            .as_ref()
            .ok_or_else(|| LayoutError::Backend("figure used before `plt.figure`".to_string()))?;
        let parent = resolve_parent(&self.grids, placement.slot())?;
        let grid = self.backend.grid(figure, parent, &request)?;
        self.grids.insert(pending.id, grid);
        Ok(())
    }

    fn build_axis(&mut self, label: char, placement: &Placement) -> Result<()> {
        let figure = self
            .figure
            .as_ref()
            .ok_or_else(|| LayoutError::Backend("figure used before `plt.figure`".to_string()))?;
        let parent = resolve_parent(&self.grids, placement.slot())?;
        let axis = self.backend.axis(figure, parent)?;
        self.axes.insert(label, axis);
        Ok(())
    }

    fn finish(self) -> Result<LayoutBundle<B>> {
        let Replayer {
            figure,
            axes,
            grids,
            ..
        } = self;
        let figure = figure
            .ok_or_else(|| LayoutError::Backend("source never creates a figure".to_string()))?;
        Ok(LayoutBundle {
            figure,
            axes,
            grids,
        })
    }
}

/// `figsize=(W, H), dpi=D)`
fn parse_figure(rest: &str) -> std::result::Result<(FigureSize, f64), String> {
    let malformed = || format!("malformed figure call `{rest}`");
    let rest = rest.strip_prefix("figsize=(").ok_or_else(malformed)?;
    let (size, dpi) = rest.split_once("), dpi=").ok_or_else(malformed)?;
    let (width, height) = size.split_once(", ").ok_or_else(malformed)?;
    let dpi = dpi.strip_suffix(')').ok_or_else(malformed)?;
    Ok((
        FigureSize::new(parse_f64(width)?, parse_f64(height)?),
        parse_f64(dpi)?,
    ))
}

/// `ID"] = mpl.gridspec.GridSpec(` or `...GridSpecFromSubplotSpec(`
fn parse_grid_header(rest: &str) -> std::result::Result<PendingGrid, String> {
    let (id, call) = rest
        .split_once("\"] = ")
        .ok_or_else(|| format!("malformed gridspec assignment `{rest}`"))?;
    match call {
        "mpl.gridspec.GridSpec(" | "mpl.gridspec.GridSpecFromSubplotSpec(" => Ok(PendingGrid {
            id: id.to_string(),
            ..PendingGrid::default()
        }),
        other => Err(format!("unsupported gridspec constructor `{other}`")),
    }
}

/// One `key=value,` line inside a gridspec call.
fn apply_argument(grid: &mut PendingGrid, line: &str) -> std::result::Result<(), String> {
    let argument = line.strip_suffix(',').unwrap_or(line);
    let (key, value) = argument
        .split_once('=')
        .ok_or_else(|| format!("expected keyword argument, got `{line}`"))?;
    match key {
        "figure" if value == "fig" => grid.placement = Some(Placement::Figure),
        "subplot_spec" => grid.placement = Some(parse_cell_ref(value)?),
        "nrows" => grid.nrows = Some(parse_usize(value)?),
        "ncols" => grid.ncols = Some(parse_usize(value)?),
        "height_ratios" => grid.height_ratios = Some(parse_ratios(value)?),
        "width_ratios" => grid.width_ratios = Some(parse_ratios(value)?),
        "wspace" => grid.wspace = Some(parse_f64(value)?),
        "hspace" => grid.hspace = Some(parse_f64(value)?),
        other => return Err(format!("unsupported gridspec argument `{other}`")),
    }
    Ok(())
}

/// `ax_X"] = fig.add_subplot(TARGET)`
fn parse_axis(rest: &str) -> std::result::Result<(char, Placement), String> {
    let (id, call) = rest
        .split_once("\"] = fig.add_subplot(")
        .ok_or_else(|| format!("malformed axis assignment `{rest}`"))?;
    let label = NameAllocator::label_of_leaf(id).ok_or_else(|| format!("`{id}` is not a leaf id"))?;
    let target = call
        .strip_suffix(')')
        .ok_or_else(|| format!("unterminated add_subplot call for `{id}`"))?;
    let placement = if target == "1, 1, 1" {
        Placement::Figure
    } else {
        parse_cell_ref(target)?
    };
    Ok((label, placement))
}

/// `gridspecs["ID"][INDEX]`
fn parse_cell_ref(text: &str) -> std::result::Result<Placement, String> {
    let malformed = || format!("malformed cell reference `{text}`");
    let inner = text.strip_prefix("gridspecs[\"").ok_or_else(malformed)?;
    let (grid, index) = inner.split_once("\"][").ok_or_else(malformed)?;
    let index = index.strip_suffix(']').ok_or_else(malformed)?;
    Ok(Placement::Cell {
        grid: grid.to_string(),
        index: parse_usize(index)?,
    })
}

fn parse_ratios(text: &str) -> std::result::Result<Vec<usize>, String> {
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or_else(|| format!("malformed ratio list `{text}`"))?;
    inner.split(", ").map(parse_usize).collect()
}

fn parse_usize(text: &str) -> std::result::Result<usize, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("expected an integer, got `{text}`"))
}

fn parse_f64(text: &str) -> std::result::Result<f64, String> {
    text.trim()
        .parse()
        .map_err(|_| format!("expected a number, got `{text}`"))
}
