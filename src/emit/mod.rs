//! Emitters walking a compiled [`PartitionTree`].
//!
//! Both backends share [`walk`]: parents before children, children in
//! left-to-right / top-to-bottom order. [`materialize`] drives a
//! [`GraphicsBackend`]; [`generate_source`] writes equivalent matplotlib code,
//! and [`replay_source`] turns that code back into backend calls.

mod materialize;
mod replay;
mod scene;
mod source;

use std::collections::BTreeMap;

use crate::error::Result;
use crate::geometry::{CellRect, FigureSize};
use crate::layout::{Leaf, PartitionNode, PartitionTree, Split};
use crate::naming::NodeId;

pub use materialize::{Materializer, materialize};
pub use replay::replay_source;
pub use scene::{AxisHandle, GridHandle, SceneBackend, SceneFigure, SubplotParams};
pub use source::{SourceGenerator, format_float, generate_source};

/// Where a node is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<'a> {
    /// Directly on the figure.
    Figure,
    /// Cell `index` (row-major) of the grid built for split `grid`.
    Cell { grid: &'a str, index: usize },
}

/// Backend-neutral description of the grid built for one split.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRequest {
    pub nrows: usize,
    pub ncols: usize,
    pub height_ratios: Vec<usize>,
    pub width_ratios: Vec<usize>,
    pub wspace: Option<f64>,
    pub hspace: Option<f64>,
}

impl From<&Split> for GridRequest {
    fn from(split: &Split) -> Self {
        let (nrows, ncols) = split.shape();
        let height_ratios = split.height_ratios();
        let width_ratios = split.width_ratios();
        Self {
            nrows,
            ncols,
            wspace: split.spacing.wspace.map(|space| space / mean(&width_ratios)),
            hspace: split.spacing.hspace.map(|space| space / mean(&height_ratios)),
            height_ratios,
            width_ratios,
        }
    }
}

/// Grid libraries measure spacing relative to the average row or column.
fn mean(values: &[usize]) -> f64 {
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

/// Callbacks invoked by [`walk`].
pub trait TreeVisitor {
    fn visit_split(&mut self, split: &Split, slot: Slot<'_>) -> Result<()>;

    fn visit_leaf(&mut self, leaf: &Leaf, slot: Slot<'_>) -> Result<()>;

    fn visit_blank(&mut self, _region: CellRect, _slot: Slot<'_>) -> Result<()> {
        Ok(())
    }
}

/// Visit every node of `tree` in emission order.
pub fn walk<V: TreeVisitor + ?Sized>(tree: &PartitionTree, visitor: &mut V) -> Result<()> {
    walk_node(&tree.root, Slot::Figure, visitor)
}

fn walk_node<V: TreeVisitor + ?Sized>(
    node: &PartitionNode,
    slot: Slot<'_>,
    visitor: &mut V,
) -> Result<()> {
    match node {
        PartitionNode::Leaf(leaf) => visitor.visit_leaf(leaf, slot),
        PartitionNode::Blank { region } => visitor.visit_blank(*region, slot),
        PartitionNode::Split(split) => {
            visitor.visit_split(split, slot)?;
            for (index, child) in split.children.iter().enumerate() {
                let child_slot = Slot::Cell {
                    grid: &split.id,
                    index,
                };
                walk_node(child, child_slot, visitor)?;
            }
            Ok(())
        }
    }
}

/// External graphics context that owns figures, grids and axes.
///
/// `parent == None` places the object on the figure itself.
pub trait GraphicsBackend {
    type Figure;
    type Grid;
    type Axis;

    fn figure(&mut self, size: FigureSize, dpi: f64) -> Result<Self::Figure>;

    fn grid(
        &mut self,
        figure: &Self::Figure,
        parent: Option<(&Self::Grid, usize)>,
        request: &GridRequest,
    ) -> Result<Self::Grid>;

    fn axis(
        &mut self,
        figure: &Self::Figure,
        parent: Option<(&Self::Grid, usize)>,
    ) -> Result<Self::Axis>;
}

/// Objects produced by one materialization, owned by the caller.
pub struct LayoutBundle<B: GraphicsBackend> {
    pub figure: B::Figure,
    /// Axis per art label.
    pub axes: BTreeMap<char, B::Axis>,
    /// Grid per split node id.
    pub grids: BTreeMap<NodeId, B::Grid>,
}
