use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::layout::{Leaf, PartitionTree, Split};
use crate::naming::NodeId;

use super::{GraphicsBackend, GridRequest, LayoutBundle, Slot, TreeVisitor, walk};

/// Build live objects for `tree` on `backend`.
///
/// The exclusive borrow keeps the graphics context ours for the whole call.
pub fn materialize<B: GraphicsBackend>(
    tree: &PartitionTree,
    config: &LayoutConfig,
    backend: &mut B,
) -> Result<LayoutBundle<B>> {
    let size = config.figure_size(tree.rows, tree.cols).size;
    let figure = backend.figure(size, config.dpi)?;
    let mut materializer = Materializer::new(backend, figure);
    walk(tree, &mut materializer)?;
    Ok(materializer.finish())
}

/// Visitor issuing one backend call per split and leaf.
pub struct Materializer<'a, B: GraphicsBackend> {
    backend: &'a mut B,
    figure: B::Figure,
    axes: BTreeMap<char, B::Axis>,
    grids: BTreeMap<NodeId, B::Grid>,
}

impl<'a, B: GraphicsBackend> Materializer<'a, B> {
    pub fn new(backend: &'a mut B, figure: B::Figure) -> Self {
        Self {
            backend,
            figure,
            axes: BTreeMap::new(),
            grids: BTreeMap::new(),
        }
    }

    pub fn finish(self) -> LayoutBundle<B> {
        LayoutBundle {
            figure: self.figure,
            axes: self.axes,
            grids: self.grids,
        }
    }
}

pub(super) fn resolve_parent<'g, G>(
    grids: &'g BTreeMap<NodeId, G>,
    slot: Slot<'_>,
) -> Result<Option<(&'g G, usize)>> {
    match slot {
        Slot::Figure => Ok(None),
        Slot::Cell { grid, index } => grids
            .get(grid)
            .map(|parent| Some((parent, index)))
            .ok_or_else(|| LayoutError::Backend(format!("grid `{grid}` used before it was built"))),
    }
}

impl<B: GraphicsBackend> TreeVisitor for Materializer<'_, B> {
    fn visit_split(&mut self, split: &Split, slot: Slot<'_>) -> Result<()> {
        let request = GridRequest::from(split);
        let parent = resolve_parent(&self.grids, slot)?;
        let grid = self.backend.grid(&self.figure, parent, &request)?;
        self.grids.insert(split.id.clone(), grid);
        Ok(())
    }

    fn visit_leaf(&mut self, leaf: &Leaf, slot: Slot<'_>) -> Result<()> {
        let parent = resolve_parent(&self.grids, slot)?;
        let axis = self.backend.axis(&self.figure, parent)?;
        self.axes.insert(leaf.label, axis);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::FigureSize;
    use crate::{Grid, compile};

    /// Records calls as strings; grids and axes are their own call index.
    #[derive(Default)]
    struct CallLog {
        calls: Vec<String>,
    }

    impl GraphicsBackend for CallLog {
        type Figure = FigureSize;
        type Grid = usize;
        type Axis = usize;

        fn figure(&mut self, size: FigureSize, dpi: f64) -> Result<FigureSize> {
            self.calls.push(format!("figure {}x{} @{}", size.width, size.height, dpi));
            Ok(size)
        }

        fn grid(
            &mut self,
            _figure: &FigureSize,
            parent: Option<(&usize, usize)>,
            request: &GridRequest,
        ) -> Result<usize> {
            self.calls.push(format!(
                "grid in {parent:?} {}x{} w={:?} h={:?}",
                request.nrows, request.ncols, request.width_ratios, request.height_ratios
            ));
            Ok(self.calls.len() - 1)
        }

        fn axis(&mut self, _figure: &FigureSize, parent: Option<(&usize, usize)>) -> Result<usize> {
            self.calls.push(format!("axis in {parent:?}"));
            Ok(self.calls.len() - 1)
        }
    }

    #[test]
    fn issues_calls_in_tree_order() {
        let config = LayoutConfig::default();
        let grid = Grid::parse_lines(&["113", "223"], '.').unwrap();
        let tree = compile(&grid, &config).unwrap();
        let mut backend = CallLog::default();

        let bundle = materialize(&tree, &config, &mut backend).unwrap();
        assert_eq!(
            backend.calls,
            vec![
                "figure 12x8 @96",
                "grid in None 1x2 w=[2, 1] h=[2]",
                "grid in Some((1, 0)) 2x1 w=[2] h=[1, 1]",
                "axis in Some((2, 0))",
                "axis in Some((2, 1))",
                "axis in Some((1, 1))",
            ]
        );
        assert_eq!(bundle.axes.keys().copied().collect::<Vec<_>>(), vec!['1', '2', '3']);
        assert_eq!(bundle.grids["gs_123"], 1);
        assert_eq!(bundle.grids["gs_12"], 2);
    }

    #[test]
    fn leaf_root_goes_on_the_figure() {
        let config = LayoutConfig::default().with_factors(Some(1.5), Some(2.0));
        let grid = Grid::parse_lines(&["aa"], '.').unwrap();
        let tree = compile(&grid, &config).unwrap();
        let mut backend = CallLog::default();

        let bundle = materialize(&tree, &config, &mut backend).unwrap();
        assert_eq!(backend.calls, vec!["figure 3x2 @96", "axis in None"]);
        assert_eq!(bundle.figure, FigureSize::new(3.0, 2.0));
        assert!(bundle.grids.is_empty());
    }
}
