//! Heuristic classification of line segments into semantic blocks.

use log::debug;

use super::table::extract_grid;
use crate::config::LayoutConfig;
use crate::types::{Block, BlockContent, BlockKind, Line, Token};

// ---------------------------------------------------------------------------
// Classification rules
// ---------------------------------------------------------------------------

fn is_header(lines: &[Line], config: &LayoutConfig) -> bool {
    lines.len() == 1 && lines[0].avg_font_size > config.header_min_font_size
}

/// Row-like repeating column structure: every line has about as many items
/// as the first, spaced about as far apart.
fn is_table(lines: &[Line], config: &LayoutConfig) -> bool {
    let first = &lines[0];
    lines.len() >= 2
        && lines.iter().all(|line| {
            line.item_count.abs_diff(first.item_count) <= config.table_item_tolerance
                && (line.spacing - first.spacing).abs() < config.table_spacing_tolerance
                && line.item_count >= config.table_min_items
        })
}

/// Prose: a consistent font size and substantive text on every line.
fn is_paragraph(lines: &[Line], config: &LayoutConfig) -> bool {
    let first = &lines[0];
    lines.iter().all(|line| {
        (line.avg_font_size - first.avg_font_size).abs() < config.paragraph_font_tolerance
            && line.text.chars().count() > config.paragraph_min_text_len
    })
}

/// Assign a [`BlockKind`] to a run of lines.
///
/// Rules are tried in order and the first match wins: header, table,
/// paragraph, then text as the fallback.  An empty run has no kind.
pub fn classify_lines(lines: &[Line], config: &LayoutConfig) -> Option<BlockKind> {
    if lines.is_empty() {
        return None;
    }

    let kind = if is_header(lines, config) {
        BlockKind::Header
    } else if is_table(lines, config) {
        BlockKind::Table
    } else if is_paragraph(lines, config) {
        BlockKind::Paragraph
    } else {
        BlockKind::Text
    };
    Some(kind)
}

// ---------------------------------------------------------------------------
// Block assembly
// ---------------------------------------------------------------------------

/// Join line texts with a single space.
fn concat_line_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten all tokens out of a run of lines.
fn collect_tokens(lines: &[Line]) -> Vec<Token> {
    lines.iter().flat_map(|l| l.tokens.iter().cloned()).collect()
}

/// Classify a run of lines and attach its kind-specific payload.
///
/// Table runs get a grid extracted from their tokens.  When the extractor
/// rejects the tokens the block stays a table without a grid.
pub fn build_block(lines: Vec<Line>, config: &LayoutConfig) -> Option<Block> {
    let kind = classify_lines(&lines, config)?;

    let content = match kind {
        BlockKind::Header => BlockContent::Header {
            text: concat_line_text(&lines),
        },
        BlockKind::Table => {
            let grid = extract_grid(&collect_tokens(&lines), config);
            if grid.is_none() {
                debug!(
                    "table block at y={} has no consistent grid",
                    lines[0].y
                );
            }
            BlockContent::Table { grid }
        }
        BlockKind::Paragraph => BlockContent::Paragraph {
            text: concat_line_text(&lines),
        },
        BlockKind::Text | BlockKind::Image => BlockContent::Text {
            text: lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        },
    };

    let y_start = lines.first().map(|l| l.y)?;
    let y_end = lines.last().map(|l| l.y)?;

    Some(Block {
        content,
        y_start,
        y_end,
        lines,
    })
}

/// Turn every segment into a classified block, dropping empty segments.
pub fn build_blocks(segments: Vec<Vec<Line>>, config: &LayoutConfig) -> Vec<Block> {
    segments
        .into_iter()
        .filter_map(|lines| build_block(lines, config))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
