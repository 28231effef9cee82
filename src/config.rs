//! Report layout configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::style::{default_line_styles, LineStyle, StyleOverflow};

/// Page width in pixels (9 in at 100 px/in).
pub const PAGE_WIDTH: u32 = 900;
/// Page height in pixels (12 in at 100 px/in).
pub const PAGE_HEIGHT: u32 = 1200;
/// Pixels per inch used to turn point sizes into pixels.
pub const PIXELS_PER_INCH: f64 = 100.0;
/// Gap between subplots, as a fraction of a cell.
pub const SUBPLOT_SPACING: f64 = 0.3;
/// Page title size in points.
pub const TITLE_FONT_SIZE: f64 = 12.0;

/// How description tables pick a parameter's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamPolicy {
    /// Take the first data row; warn if the column varies.
    #[default]
    FirstRow,
    /// Fail the build if any described parameter column varies.
    RequireConstant,
}

/// Layout options for one report.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    pub rows_per_page: usize,
    pub cols_per_page: usize,
    /// Base font size in points.
    pub font_size: f64,
    pub legend_cols: usize,
    pub gray_scale: bool,
    pub line_styles: Vec<String>,
    pub descriptions_per_page: usize,
    pub style_overflow: StyleOverflow,
    pub param_policy: ParamPolicy,
    pub delimiter: char,
    pub output_extension: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            rows_per_page: 4,
            cols_per_page: 3,
            font_size: 8.0,
            legend_cols: 1,
            gray_scale: false,
            line_styles: default_line_styles(),
            descriptions_per_page: 4,
            style_overflow: StyleOverflow::default(),
            param_policy: ParamPolicy::default(),
            delimiter: ',',
            output_extension: "html".to_string(),
        }
    }
}

impl ReportConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: ReportConfig = serde_json::from_str(&text).map_err(|e| {
            ReportError::InvalidConfig(format!("{}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("rows_per_page", self.rows_per_page),
            ("cols_per_page", self.cols_per_page),
            ("legend_cols", self.legend_cols),
            ("descriptions_per_page", self.descriptions_per_page),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(ReportError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ReportError::InvalidConfig(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if self.line_styles.is_empty() {
            return Err(ReportError::InvalidConfig("line_styles is empty".into()));
        }
        for spec in &self.line_styles {
            spec.parse::<LineStyle>()?;
        }
        if !self.delimiter.is_ascii() {
            return Err(ReportError::InvalidConfig(format!(
                "delimiter '{}' is not a single ASCII character",
                self.delimiter
            )));
        }
        if self.output_extension.is_empty() {
            return Err(ReportError::InvalidConfig("output_extension is empty".into()));
        }
        Ok(())
    }

    /// Plot positions per chart page. The legend row is not counted.
    pub fn plots_per_page(&self) -> usize {
        self.rows_per_page * self.cols_per_page
    }

    /// Grid rows per chart page, including the legend row.
    pub fn grid_rows(&self) -> usize {
        self.rows_per_page + 1
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII.
        self.delimiter as u8
    }

    /// Font size in pixels.
    pub fn font_px(&self) -> f64 {
        points_to_px(self.font_size)
    }
}

pub fn points_to_px(points: f64) -> f64 {
    points * PIXELS_PER_INCH / 72.0
}
