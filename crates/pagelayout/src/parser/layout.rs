//! Line clustering and block segmentation.
//!
//! Both stages are pure transformations over already-normalized tokens:
//!
//! ```text
//! Token[]  ->  Line[]  ->  Vec<Line>[]
//!         cluster_lines  segment_lines
//! ```

use std::collections::BTreeMap;

use log::debug;

use crate::config::LayoutConfig;
use crate::types::{Line, Token};

// ---------------------------------------------------------------------------
// Token -> line clustering
// ---------------------------------------------------------------------------

/// Index of the quantization bucket that `y` falls into.
///
/// Half-way values round upward, so with a tolerance of 5 both `2.5` and
/// `-2.5` land in the buckets at `5` and `0` respectively.
fn quantize(y: f64, tolerance: f64) -> i64 {
    (y / tolerance + 0.5).floor() as i64
}

/// Group tokens into lines by quantized vertical position.
///
/// Each token's y is rounded to the nearest multiple of
/// `config.line_tolerance`; tokens sharing a rounded value form one line
/// whose representative y is that value.  Lines come out top to bottom and
/// tokens within each line left to right.
pub fn cluster_lines(tokens: Vec<Token>, config: &LayoutConfig) -> Vec<Line> {
    let tolerance = config.line_tolerance;

    let mut buckets: BTreeMap<i64, Vec<Token>> = BTreeMap::new();
    for token in tokens {
        buckets
            .entry(quantize(token.y, tolerance))
            .or_default()
            .push(token);
    }

    let lines: Vec<Line> = buckets
        .into_iter()
        .map(|(bucket, tokens)| Line::new(bucket as f64 * tolerance, tokens))
        .collect();

    debug!("clustered tokens into {} lines", lines.len());
    lines
}

// ---------------------------------------------------------------------------
// Line -> block segmentation
// ---------------------------------------------------------------------------

/// Whether the gap between `previous` and `line` is wide enough to start a
/// new block.
fn is_block_break(previous: &Line, line: &Line, config: &LayoutConfig) -> bool {
    let gap = line.y - previous.y;
    let threshold = config
        .block_gap_floor
        .max(line.avg_font_size * config.block_gap_factor);
    gap > threshold
}

/// Split an ordered line sequence into runs of vertically contiguous lines.
///
/// A line whose distance from the previous line exceeds
/// `max(block_gap_floor, avg_font_size * block_gap_factor)` opens a new run.
/// Every input line ends up in exactly one run, in input order.
pub fn segment_lines(lines: Vec<Line>, config: &LayoutConfig) -> Vec<Vec<Line>> {
    let mut segments: Vec<Vec<Line>> = Vec::new();
    let mut current: Vec<Line> = Vec::new();

    for line in lines {
        let breaks = current
            .last()
            .is_some_and(|previous| is_block_break(previous, &line, config));

        if breaks {
            segments.push(std::mem::take(&mut current));
        }
        current.push(line);
    }

    if !current.is_empty() {
        segments.push(current);
    }

    debug!("segmented lines into {} blocks", segments.len());
    segments
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
