//! Compile ascii-art plot layouts into nested grid partitions.
//!
//! Each character of the art names a plot region; every region must be a
//! solid rectangle. The art is parsed into a [`Grid`], decomposed into a
//! [`PartitionTree`] of guillotine splits, then either materialized on a
//! [`GraphicsBackend`] or rendered as matplotlib source.
//!
//! ```no_run
//! use ascii_layout::{LayoutCompiler, LayoutConfig};
//!
//! let compiler = LayoutCompiler::new(LayoutConfig::default());
//! let source = compiler.generate_source("113\n223\n")?;
//! println!("{source}");
//! # Ok::<(), ascii_layout::LayoutError>(())
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod naming;
pub mod pipeline;
pub mod width;

pub use config::{FigureResolution, LayoutConfig, SpacingRule};
pub use emit::{
    GraphicsBackend, GridRequest, LayoutBundle, Materializer, SceneBackend, Slot,
    SourceGenerator, TreeVisitor, generate_source, materialize, replay_source, walk,
};
pub use error::{ConfigError, LayoutError, Result};
pub use geometry::{CellRect, FigureBox, FigureSize};
pub use grid::{Cell, Grid, LabelRegion};
pub use layout::{
    Leaf, Orientation, PartitionNode, PartitionTree, Spacing, Split, compile, compile_with_metrics,
};
pub use logging::{
    LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult, MemorySink,
    WriterSink,
};
pub use metrics::{CompileMetrics, MetricSnapshot};
pub use naming::{NameAllocator, NodeId};
pub use pipeline::LayoutCompiler;
