//! Guillotine decomposition of a parsed grid.
//!
//! Each region is cut at every column boundary no label straddles; failing
//! that, at every such row boundary. Pieces recurse independently, so nested
//! splits compute their own ratios.

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::geometry::CellRect;
use crate::grid::{Grid, LabelRegion};
use crate::metrics::CompileMetrics;
use crate::naming::NameAllocator;

use super::core::{Leaf, Orientation, PartitionNode, PartitionTree, Spacing, Split};

/// Compile a grid into its partition tree.
pub fn compile(grid: &Grid, config: &LayoutConfig) -> Result<PartitionTree> {
    compile_with_metrics(grid, config, &mut CompileMetrics::new())
}

/// Same as [`compile`], recording counters into `metrics`.
pub fn compile_with_metrics(
    grid: &Grid,
    config: &LayoutConfig,
    metrics: &mut CompileMetrics,
) -> Result<PartitionTree> {
    config.validate()?;
    let arena = grid.labels();
    metrics.record_labels(arena.len());

    let mut compiler = RegionCompiler {
        arena,
        config,
        names: NameAllocator::new(),
        metrics,
    };
    let members: Vec<usize> = (0..arena.len()).collect();
    let root = compiler.compile_region(grid.bounds(), &members, 0)?;

    Ok(PartitionTree {
        root,
        rows: grid.rows(),
        cols: grid.cols(),
        labels: arena.to_vec(),
    })
}

struct RegionCompiler<'a> {
    arena: &'a [LabelRegion],
    config: &'a LayoutConfig,
    names: NameAllocator,
    metrics: &'a mut CompileMetrics,
}

impl RegionCompiler<'_> {
    /// `members` indexes the arena entries lying fully inside `region`.
    fn compile_region(
        &mut self,
        region: CellRect,
        members: &[usize],
        depth: usize,
    ) -> Result<PartitionNode> {
        match members {
            [] => {
                self.metrics.record_blank();
                return Ok(PartitionNode::Blank { region });
            }
            [only] if self.arena[*only].bounds == region => {
                self.metrics.record_leaf(depth);
                let label = self.arena[*only].label;
                return Ok(PartitionNode::Leaf(Leaf {
                    id: self.names.leaf(label),
                    label,
                    region,
                }));
            }
            _ => {}
        }

        for orientation in [Orientation::Columns, Orientation::Rows] {
            let pieces = self.pieces(region, members, orientation);
            if pieces.len() >= 2 {
                return self.split(region, members, depth, orientation, &pieces);
            }
        }

        let mut labels: Vec<char> = members.iter().map(|&i| self.arena[i].label).collect();
        labels.sort_unstable();
        Err(LayoutError::AmbiguousLayout {
            labels: labels.into_iter().collect(),
            region,
        })
    }

    /// Inclusive ranges between consecutive valid cuts along `orientation`.
    fn pieces(
        &mut self,
        region: CellRect,
        members: &[usize],
        orientation: Orientation,
    ) -> Vec<(usize, usize)> {
        let (start, end) = match orientation {
            Orientation::Columns => (region.left, region.right),
            Orientation::Rows => (region.top, region.bottom),
        };
        self.metrics.record_cuts_examined(end - start);

        let mut pieces = Vec::new();
        let mut piece_start = start;
        for cut in start + 1..=end {
            let clean = members.iter().all(|&i| {
                let (lo, hi) = extent(&self.arena[i].bounds, orientation);
                hi < cut || lo >= cut
            });
            if clean {
                pieces.push((piece_start, cut - 1));
                piece_start = cut;
            }
        }
        pieces.push((piece_start, end));
        pieces
    }

    fn split(
        &mut self,
        region: CellRect,
        members: &[usize],
        depth: usize,
        orientation: Orientation,
        pieces: &[(usize, usize)],
    ) -> Result<PartitionNode> {
        self.metrics.record_split(depth);
        let id = self
            .names
            .split(members.iter().map(|&i| self.arena[i].label));

        let mut children = Vec::with_capacity(pieces.len());
        let mut ratios = Vec::with_capacity(pieces.len());
        for &(lo, hi) in pieces {
            let sub_region = match orientation {
                Orientation::Columns => region.with_cols(lo, hi),
                Orientation::Rows => region.with_rows(lo, hi),
            };
            let sub_members: Vec<usize> = members
                .iter()
                .copied()
                .filter(|&i| sub_region.contains(&self.arena[i].bounds))
                .collect();
            children.push(self.compile_region(sub_region, &sub_members, depth + 1)?);
            ratios.push(hi - lo + 1);
        }

        let (wspace, hspace) = self.config.spacing_at(depth);
        Ok(PartitionNode::Split(Split {
            id,
            orientation,
            region,
            depth,
            children,
            ratios,
            spacing: Spacing { wspace, hspace },
        }))
    }
}

fn extent(bounds: &CellRect, orientation: Orientation) -> (usize, usize) {
    match orientation {
        Orientation::Columns => (bounds.left, bounds.right),
        Orientation::Rows => (bounds.top, bounds.bottom),
    }
}
