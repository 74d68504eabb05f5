//! Tunable constants for the layout heuristics.
//!
//! Every threshold used by the pipeline lives in [`LayoutConfig`].  The
//! defaults are the values the heuristics were tuned with; a TOML file can
//! override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::LayoutError;

/// Tuning knobs for line clustering, block segmentation, classification and
/// table-grid extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Token y positions are quantized to multiples of this value; tokens
    /// sharing a quantized value form one line.
    pub line_tolerance: f64,
    /// Absolute floor of the vertical gap that starts a new block.
    pub block_gap_floor: f64,
    /// A gap larger than `avg_font_size * block_gap_factor` starts a new
    /// block (subject to `block_gap_floor`).
    pub block_gap_factor: f64,
    /// Single-line blocks with an average font size strictly above this are
    /// headers.
    pub header_min_font_size: f64,
    /// Maximum item-count difference between a table line and the first line.
    pub table_item_tolerance: usize,
    /// Table lines must keep their spacing strictly within this distance of
    /// the first line's spacing.
    pub table_spacing_tolerance: f64,
    /// Minimum number of tokens on every table line.
    pub table_min_items: usize,
    /// Paragraph lines must keep their font size strictly within this
    /// distance of the first line's.
    pub paragraph_font_tolerance: f64,
    /// Paragraph lines must be strictly longer than this many characters.
    pub paragraph_min_text_len: usize,
    /// Tokens closer than this to the row anchor belong to the same grid row.
    pub row_tolerance: f64,
    /// Grid rows with fewer cells are discarded.
    pub min_row_cells: usize,
    /// Minimum number of qualifying rows for a grid.
    pub min_table_rows: usize,
    /// Maximum difference between the longest and shortest grid row.
    pub column_count_tolerance: usize,
    /// Tokens per window in the whole-page table scan.
    pub window_size: usize,
    /// Window advance in the whole-page table scan.
    pub window_step: usize,
    /// Display scale the viewer starts at.
    pub default_scale: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 5.0,
            block_gap_floor: 20.0,
            block_gap_factor: 1.5,
            header_min_font_size: 14.0,
            table_item_tolerance: 1,
            table_spacing_tolerance: 5.0,
            table_min_items: 2,
            paragraph_font_tolerance: 2.0,
            paragraph_min_text_len: 20,
            row_tolerance: 5.0,
            min_row_cells: 2,
            min_table_rows: 2,
            column_count_tolerance: 1,
            window_size: 40,
            window_step: 20,
            default_scale: 1.5,
        }
    }
}

impl LayoutConfig {
    /// Parse a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, LayoutError> {
        let config: LayoutConfig =
            toml::from_str(s).map_err(|e| LayoutError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Reject values that would make the pipeline degenerate.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = [
            ("line_tolerance", self.line_tolerance),
            ("row_tolerance", self.row_tolerance),
            ("default_scale", self.default_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }

        let non_negative = [
            ("block_gap_floor", self.block_gap_floor),
            ("block_gap_factor", self.block_gap_factor),
            ("table_spacing_tolerance", self.table_spacing_tolerance),
            ("paragraph_font_tolerance", self.paragraph_font_tolerance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.window_step == 0 || self.window_size == 0 {
            return Err(LayoutError::Config(
                "window_size and window_step must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
