//! End-to-end entry point: art text in, tree / source / live objects out.
//!
//! Parsing and compilation finish before any emitter runs, so a failing
//! input never reaches the graphics backend.

use std::time::Instant;

use serde_json::json;

use crate::config::LayoutConfig;
use crate::emit::{GraphicsBackend, LayoutBundle, generate_source, materialize};
use crate::error::{LayoutError, Result};
use crate::grid::Grid;
use crate::layout::{PartitionTree, compile_with_metrics};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::CompileMetrics;

const TARGET: &str = "ascii_layout::compile";
const EMIT_TARGET: &str = "ascii_layout::emit";

/// Compiler bound to one resolved configuration and an optional logger.
#[derive(Clone)]
pub struct LayoutCompiler {
    config: LayoutConfig,
    logger: Option<Logger>,
}

impl LayoutCompiler {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Parse and compile `art` into an immutable partition tree.
    pub fn compile_art(&self, art: &str) -> Result<PartitionTree> {
        let started = Instant::now();
        let result = self.compile_inner(art);
        match &result {
            Ok(tree) => self.emit(
                LogLevel::Info,
                TARGET,
                "tree.compiled",
                [
                    json_kv("leaves", tree.leaf_count()),
                    json_kv("splits", tree.split_count()),
                    json_kv("max_depth", tree.max_depth()),
                    json_kv("fingerprint", tree.fingerprint()),
                    json_kv("elapsed_us", started.elapsed().as_micros() as u64),
                ],
            ),
            Err(err) => self.emit(
                LogLevel::Error,
                TARGET,
                "compile.failed",
                [json_kv("error", err.to_string())],
            ),
        }
        result
    }

    fn compile_inner(&self, art: &str) -> Result<PartitionTree> {
        self.config.validate()?;
        let started = Instant::now();
        let grid = Grid::parse_art(art, self.config.blank)?;
        self.emit(
            LogLevel::Debug,
            TARGET,
            "grid.parsed",
            [
                json_kv("rows", grid.rows()),
                json_kv("cols", grid.cols()),
                json_kv("labels", grid.labels().len()),
            ],
        );

        let mut metrics = CompileMetrics::new();
        let tree = compile_with_metrics(&grid, &self.config, &mut metrics)?;
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(metrics.snapshot(started.elapsed()).to_log_event(TARGET));
        }
        Ok(tree)
    }

    /// Compile `art` and render the matplotlib program that rebuilds it.
    pub fn generate_source(&self, art: &str) -> Result<String> {
        let tree = self.compile_art(art)?;
        self.warn_overrides(&tree);
        let source = generate_source(&tree, &self.config)?;
        self.emit(
            LogLevel::Info,
            EMIT_TARGET,
            "source.generated",
            [
                json_kv("bytes", source.len()),
                json_kv("digest", blake3::hash(source.as_bytes()).to_hex().to_string()),
            ],
        );
        Ok(source)
    }

    /// Compile `art` and build live objects on `backend`.
    pub fn materialize<B: GraphicsBackend>(
        &self,
        art: &str,
        backend: &mut B,
    ) -> Result<LayoutBundle<B>> {
        let tree = self.compile_art(art)?;
        self.warn_overrides(&tree);
        let bundle = materialize(&tree, &self.config, backend).inspect_err(|err: &LayoutError| {
            self.emit(
                LogLevel::Error,
                EMIT_TARGET,
                "materialize.failed",
                [json_kv("error", err.to_string())],
            )
        })?;
        self.emit(
            LogLevel::Info,
            EMIT_TARGET,
            "layout.materialized",
            [
                json_kv("axes", bundle.axes.len()),
                json_kv("grids", bundle.grids.len()),
            ],
        );
        Ok(bundle)
    }

    fn warn_overrides(&self, tree: &PartitionTree) {
        let resolution = self.config.figure_size(tree.rows, tree.cols);
        for field in resolution.overridden {
            self.emit(
                LogLevel::Warn,
                TARGET,
                "figure.size_overridden",
                [
                    json_kv("field", field),
                    json_kv(
                        "inches",
                        json!(if field == "width" {
                            resolution.size.width
                        } else {
                            resolution.size.height
                        }),
                    ),
                ],
            );
        }
    }

    fn emit(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(level, target, message, fields));
        }
    }
}

impl Default for LayoutCompiler {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::SceneBackend;
    use crate::logging::MemorySink;

    #[test]
    fn logs_each_stage() {
        let sink = MemorySink::new();
        let compiler = LayoutCompiler::default().with_logger(Logger::new(sink.clone()));
        compiler.generate_source("aac\nbbc\n").unwrap();
        assert_eq!(
            sink.messages(),
            vec![
                "grid.parsed",
                "compile_metrics",
                "tree.compiled",
                "source.generated"
            ]
        );
    }

    #[test]
    fn space_blank_marker_compiles_edge_blanks() {
        let compiler = LayoutCompiler::new(LayoutConfig::default().with_blank(' '));
        let tree = compiler.compile_art("a \nab\n").unwrap();
        assert_eq!((tree.rows, tree.cols), (2, 2));
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn failures_are_logged_and_nothing_is_built() {
        let sink = MemorySink::new();
        let compiler = LayoutCompiler::default().with_logger(Logger::new(sink.clone()));
        let mut scene = SceneBackend::new();
        let err = compiler.materialize("ab\nba\n", &mut scene).err().unwrap();
        assert!(matches!(err, LayoutError::NonRectangularLabel { .. }));
        assert!(scene.figures().is_empty());
        assert_eq!(sink.messages(), vec!["compile.failed"]);
    }

    #[test]
    fn warns_when_factor_overrides_size() {
        let sink = MemorySink::new();
        let config = LayoutConfig::default().with_factors(None, Some(0.5));
        let compiler = LayoutCompiler::new(config).with_logger(Logger::new(sink.clone()));
        let mut scene = SceneBackend::new();
        let bundle = compiler.materialize("ab\nab\n", &mut scene).unwrap();

        assert_eq!(bundle.figure.size.height, 1.0);
        let warnings: Vec<_> = sink
            .events()
            .into_iter()
            .filter(|event| event.level == LogLevel::Warn)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].fields["field"], json!("height"));
    }

    #[test]
    fn compiles_without_logger() {
        let tree = LayoutCompiler::default().compile_art("ab").unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }
}
