//! Mapping a vertical coordinate back to the block that contains it.

use crate::types::Block;

/// Return the first block whose `[y_start, y_end]` range contains `y`.
///
/// Both bounds are inclusive.  Text blocks never overlap, so at most one of
/// them can match.  An image block placed inside a text block's range always
/// comes after that block, so a hit at the image's y returns the text block.
pub fn hit_test(blocks: &[Block], y: f64) -> Option<&Block> {
    blocks.iter().find(|block| block.contains(y))
}
