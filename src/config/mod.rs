//! Resolved configuration threaded through the compiler and both emitters.
//!
//! A [`LayoutConfig`] is built once per call (defaults, then per-call
//! overrides) and passed by reference; nothing here is global.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::FigureSize;
use crate::width::glyph_width;

/// How the base spacing scales with split nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpacingRule {
    /// Every split uses the base spacing.
    #[default]
    Uniform,
    /// A split at depth `d` uses `base * factor^d` (the root is depth 0).
    Geometric { factor: f64 },
}

/// Configuration knobs for one compile/emit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Figure width in inches.
    pub width: f64,
    /// Figure height in inches.
    pub height: f64,
    /// Inches per art column. Overrides `width` when set.
    pub width_factor: Option<f64>,
    /// Inches per art row. Overrides `height` when set.
    pub height_factor: Option<f64>,
    /// Dots per inch of the figure.
    pub dpi: f64,
    /// Horizontal space between axes, in art cells. `None` leaves the library default.
    pub wspace: Option<f64>,
    /// Vertical space between axes, in art cells. `None` leaves the library default.
    pub hspace: Option<f64>,
    /// Depth-dependent scaling applied to `wspace`/`hspace`.
    pub spacing_rule: SpacingRule,
    /// Glyph marking empty cells that get no axis.
    pub blank: char,
    /// Append a snippet labelling every axis to generated source.
    pub annotate: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 12.0,
            height: 8.0,
            width_factor: None,
            height_factor: None,
            dpi: 96.0,
            wspace: Some(0.6),
            hspace: Some(0.5),
            spacing_rule: SpacingRule::Uniform,
            blank: '.',
            annotate: true,
        }
    }
}

/// Figure size after applying the per-cell factors.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureResolution {
    pub size: FigureSize,
    /// Names of explicit sizes that a factor replaced.
    pub overridden: Vec<&'static str>,
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON, filling unspecified fields with defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_factors(mut self, width_factor: Option<f64>, height_factor: Option<f64>) -> Self {
        self.width_factor = width_factor;
        self.height_factor = height_factor;
        self
    }

    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_spacing(mut self, wspace: Option<f64>, hspace: Option<f64>) -> Self {
        self.wspace = wspace;
        self.hspace = hspace;
        self
    }

    pub fn with_spacing_rule(mut self, rule: SpacingRule) -> Self {
        self.spacing_rule = rule;
        self
    }

    pub fn with_blank(mut self, blank: char) -> Self {
        self.blank = blank;
        self
    }

    pub fn with_annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;
        positive("dpi", self.dpi)?;
        if let Some(factor) = self.width_factor {
            positive("width_factor", factor)?;
        }
        if let Some(factor) = self.height_factor {
            positive("height_factor", factor)?;
        }
        if let Some(space) = self.wspace {
            non_negative("wspace", space)?;
        }
        if let Some(space) = self.hspace {
            non_negative("hspace", space)?;
        }
        if let SpacingRule::Geometric { factor } = self.spacing_rule {
            positive("spacing_rule.factor", factor)?;
        }
        if self.blank.is_alphanumeric() || glyph_width(self.blank) != 1 {
            return Err(ConfigError::BlankMarker(self.blank));
        }
        Ok(())
    }

    /// Raw `(wspace, hspace)` for a split at `depth`, before ratio normalisation.
    pub fn spacing_at(&self, depth: usize) -> (Option<f64>, Option<f64>) {
        let scale = match self.spacing_rule {
            SpacingRule::Uniform => 1.0,
            SpacingRule::Geometric { factor } => factor.powi(depth.min(i32::MAX as usize) as i32),
        };
        (self.wspace.map(|s| s * scale), self.hspace.map(|s| s * scale))
    }

    /// Resolve the figure size for an art grid of `rows` x `cols` cells.
    pub fn figure_size(&self, rows: usize, cols: usize) -> FigureResolution {
        let mut overridden = Vec::new();
        let width = match self.width_factor {
            Some(factor) => {
                overridden.push("width");
                factor * cols as f64
            }
            None => self.width,
        };
        let height = match self.height_factor {
            Some(factor) => {
                overridden.push("height");
                factor * rows as f64
            }
            None => self.height,
        };
        FigureResolution {
            size: FigureSize::new(width, height),
            overridden,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
