use crate::config::LayoutConfig;
use crate::error::Result;
use crate::layout::{Leaf, PartitionTree, Split};

use super::{GridRequest, Slot, TreeVisitor, walk};

/// Render the matplotlib program that rebuilds `tree`.
///
/// Output depends only on the tree and config, so repeated runs are
/// byte-identical.
pub fn generate_source(tree: &PartitionTree, config: &LayoutConfig) -> Result<String> {
    let size = config.figure_size(tree.rows, tree.cols).size;
    let mut generator = SourceGenerator::new();
    generator.line("import matplotlib as mpl");
    generator.line("import matplotlib.pyplot as plt");
    generator.line(&format!(
        "fig = plt.figure(figsize=({}, {}), dpi={})",
        format_float(size.width),
        format_float(size.height),
        format_float(config.dpi)
    ));
    generator.line("");
    generator.line("gridspecs = {}");
    generator.line("axes = {}");

    walk(tree, &mut generator)?;

    if config.annotate {
        generator.line("");
        generator.line("for name, ax in axes.items():");
        generator.line("    ax.annotate(name, (0.5, 0.5), ha=\"center\", va=\"center\")");
    }
    Ok(generator.finish())
}

/// Shortest representation that parses back to the same `f64`, always with
/// a decimal point or exponent so Python reads it as a float.
pub fn format_float(value: f64) -> String {
    format!("{value:?}")
}

fn format_ratios(ratios: &[usize]) -> String {
    let items: Vec<String> = ratios.iter().map(usize::to_string).collect();
    format!("[{}]", items.join(", "))
}

fn cell_ref(grid: &str, index: usize) -> String {
    format!("gridspecs[\"{grid}\"][{index}]")
}

/// Visitor appending one statement block per split and one line per leaf.
#[derive(Debug, Default)]
pub struct SourceGenerator {
    out: String,
}

impl SourceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl TreeVisitor for SourceGenerator {
    fn visit_split(&mut self, split: &Split, slot: Slot<'_>) -> Result<()> {
        let request = GridRequest::from(split);
        self.line("");
        match slot {
            Slot::Figure => {
                self.line(&format!("gridspecs[\"{}\"] = mpl.gridspec.GridSpec(", split.id));
                self.line("    figure=fig,");
            }
            Slot::Cell { grid, index } => {
                self.line(&format!(
                    "gridspecs[\"{}\"] = mpl.gridspec.GridSpecFromSubplotSpec(",
                    split.id
                ));
                self.line(&format!("    subplot_spec={},", cell_ref(grid, index)));
            }
        }
        self.line(&format!("    nrows={},", request.nrows));
        self.line(&format!("    ncols={},", request.ncols));
        self.line(&format!("    height_ratios={},", format_ratios(&request.height_ratios)));
        self.line(&format!("    width_ratios={},", format_ratios(&request.width_ratios)));
        if let Some(wspace) = request.wspace {
            self.line(&format!("    wspace={},", format_float(wspace)));
        }
        if let Some(hspace) = request.hspace {
            self.line(&format!("    hspace={},", format_float(hspace)));
        }
        self.line(")");
        Ok(())
    }

    fn visit_leaf(&mut self, leaf: &Leaf, slot: Slot<'_>) -> Result<()> {
        let target = match slot {
            Slot::Figure => "1, 1, 1".to_string(),
            Slot::Cell { grid, index } => cell_ref(grid, index),
        };
        self.line(&format!("axes[\"{}\"] = fig.add_subplot({target})", leaf.id));
        Ok(())
    }
}
