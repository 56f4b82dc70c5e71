use std::fmt;

use serde::Serialize;

use crate::geometry::CellRect;
use crate::grid::LabelRegion;
use crate::naming::NodeId;

/// Axis along which a split cuts its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Vertical cuts: children sit side by side, left to right.
    Columns,
    /// Horizontal cuts: children stack top to bottom.
    Rows,
}

/// Spacing attached to one split, in art cells for its depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Spacing {
    pub wspace: Option<f64>,
    pub hspace: Option<f64>,
}

/// Terminal node bound to exactly one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf {
    pub id: NodeId,
    pub label: char,
    pub region: CellRect,
}

/// Nested sub-grid with ordered, proportioned children along one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Split {
    pub id: NodeId,
    pub orientation: Orientation,
    pub region: CellRect,
    pub depth: usize,
    pub children: Vec<PartitionNode>,
    /// Span of each child along the split axis, in art cells.
    pub ratios: Vec<usize>,
    pub spacing: Spacing,
}

impl Split {
    /// `(nrows, ncols)` of the grid this split becomes.
    pub fn shape(&self) -> (usize, usize) {
        match self.orientation {
            Orientation::Columns => (1, self.children.len()),
            Orientation::Rows => (self.children.len(), 1),
        }
    }

    pub fn height_ratios(&self) -> Vec<usize> {
        match self.orientation {
            Orientation::Columns => vec![self.region.height()],
            Orientation::Rows => self.ratios.clone(),
        }
    }

    pub fn width_ratios(&self) -> Vec<usize> {
        match self.orientation {
            Orientation::Columns => self.ratios.clone(),
            Orientation::Rows => vec![self.region.width()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PartitionNode {
    Leaf(Leaf),
    Split(Split),
    /// Region with no label; keeps its share of the parent but holds no axis.
    Blank { region: CellRect },
}

impl PartitionNode {
    pub fn region(&self) -> CellRect {
        match self {
            PartitionNode::Leaf(leaf) => leaf.region,
            PartitionNode::Split(split) => split.region,
            PartitionNode::Blank { region } => *region,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            PartitionNode::Leaf(leaf) => Some(&leaf.id),
            PartitionNode::Split(split) => Some(&split.id),
            PartitionNode::Blank { .. } => None,
        }
    }

    /// Pre-order traversal, parents before children.
    pub fn descendants(&self) -> Vec<&PartitionNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            if let PartitionNode::Split(split) = node {
                stack.extend(split.children.iter().rev());
            }
        }
        out
    }
}

/// Result of one compile: immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionTree {
    pub root: PartitionNode,
    pub rows: usize,
    pub cols: usize,
    pub labels: Vec<LabelRegion>,
}

impl PartitionTree {
    pub fn leaves(&self) -> Vec<&Leaf> {
        self.root
            .descendants()
            .into_iter()
            .filter_map(|node| match node {
                PartitionNode::Leaf(leaf) => Some(leaf),
                _ => None,
            })
            .collect()
    }

    pub fn splits(&self) -> Vec<&Split> {
        self.root
            .descendants()
            .into_iter()
            .filter_map(|node| match node {
                PartitionNode::Split(split) => Some(split),
                _ => None,
            })
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    pub fn split_count(&self) -> usize {
        self.splits().len()
    }

    /// Deepest split nesting level; zero when the root is a leaf.
    pub fn max_depth(&self) -> usize {
        self.splits()
            .iter()
            .map(|split| split.depth + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn find(&self, id: &str) -> Option<&PartitionNode> {
        self.root
            .descendants()
            .into_iter()
            .find(|node| node.id() == Some(id))
    }

    /// Stable digest of the tree shape, ids, ratios and spacing.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&canonical).to_hex().to_string()
    }
}

impl fmt::Display for PartitionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, &self.root, 0)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &PartitionNode, level: usize) -> fmt::Result {
    let indent = " ".repeat(level);
    match node {
        PartitionNode::Leaf(leaf) => writeln!(f, "{indent}{} [{}]", leaf.id, leaf.region),
        PartitionNode::Blank { region } => writeln!(f, "{indent}blank [{region}]"),
        PartitionNode::Split(split) => {
            let ratios: Vec<String> = split.ratios.iter().map(usize::to_string).collect();
            writeln!(
                f,
                "{indent}{} {:?} ratios={} [{}]",
                split.id,
                split.orientation,
                ratios.join(":"),
                split.region
            )?;
            for child in &split.children {
                write_node(f, child, level + 4)?;
            }
            Ok(())
        }
    }
}
