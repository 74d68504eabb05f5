use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::types::{TableGrid, Token};

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// A grid found by the whole-page window scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowTable {
    /// Index of the window's first token in the page's token sequence.
    pub offset: usize,
    pub grid: TableGrid,
}

// ---------------------------------------------------------------------------
// Grid extraction
// ---------------------------------------------------------------------------

/// Group tokens into rows by vertical proximity to a row anchor.
///
/// Tokens are visited top to bottom (stable for equal y).  A token stays in
/// the current row while `|y - anchor| < config.row_tolerance`; otherwise the
/// row is closed and a new one anchored at the token's y.  Rows with fewer
/// than `config.min_row_cells` tokens are discarded.
pub fn group_into_rows<'a>(tokens: &'a [Token], config: &LayoutConfig) -> Vec<Vec<&'a Token>> {
    let mut sorted: Vec<&Token> = tokens.iter().collect();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    let mut rows: Vec<Vec<&Token>> = Vec::new();
    let mut current: Vec<&Token> = Vec::new();
    let mut anchor: Option<f64> = None;

    for token in sorted {
        match anchor {
            Some(y) if (token.y - y).abs() < config.row_tolerance => current.push(token),
            _ => {
                if current.len() >= config.min_row_cells {
                    rows.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
                anchor = Some(token.y);
                current.push(token);
            }
        }
    }

    if current.len() >= config.min_row_cells {
        rows.push(current);
    }

    rows
}

/// Extract a near-rectangular cell grid from a token window.
///
/// Returns `None` ("not a table") when fewer than `config.min_table_rows`
/// rows qualify or when the longest and shortest rows differ by more than
/// `config.column_count_tolerance` cells.
pub fn extract_grid(tokens: &[Token], config: &LayoutConfig) -> Option<TableGrid> {
    let rows = group_into_rows(tokens, config);
    if rows.len() < config.min_table_rows.max(1) {
        return None;
    }

    let max = rows.iter().map(Vec::len).max()?;
    let min = rows.iter().map(Vec::len).min()?;
    if max - min > config.column_count_tolerance {
        return None;
    }

    let rows = rows
        .into_iter()
        .map(|mut row| {
            row.sort_by(|a, b| a.x.total_cmp(&b.x));
            row.into_iter().map(|t| t.text.clone()).collect()
        })
        .collect();

    Some(TableGrid { rows })
}

// ---------------------------------------------------------------------------
// Whole-page window scan
// ---------------------------------------------------------------------------

/// Scan a page's tokens, in appearance order, for tables.
///
/// Windows of up to `config.window_size` tokens start every
/// `config.window_step` tokens; each window is run through
/// [`extract_grid`] independently.  Windows overlap, so one table may be
/// reported more than once.
pub fn scan_windows(tokens: &[Token], config: &LayoutConfig) -> Vec<WindowTable> {
    let step = config.window_step.max(1);

    let tables: Vec<WindowTable> = (0..tokens.len())
        .step_by(step)
        .filter_map(|offset| {
            let end = (offset + config.window_size).min(tokens.len());
            extract_grid(&tokens[offset..end], config).map(|grid| WindowTable { offset, grid })
        })
        .collect();

    debug!(
        "window scan over {} tokens found {} tables",
        tokens.len(),
        tables.len()
    );
    tables
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
