//! Conversion of raw rendering-service items into display-space tokens.

use crate::types::{RawTextItem, Token};

/// Map a raw text item into a [`Token`].
///
/// The item's transform translation `(e, f)` gives its origin in page space
/// (bottom-left origin).  The y axis is flipped against `viewport_height` and
/// every length is multiplied by the display `scale`.  The glyph-run height
/// doubles as the font size.
pub fn normalize_item(item: &RawTextItem, viewport_height: f64, scale: f64) -> Token {
    let [_scale_x, _skew_x, _skew_y, _scale_y, x, y] = item.transform;

    Token {
        text: item.text.clone(),
        x: x * scale,
        y: (viewport_height - y) * scale,
        width: item.width * scale,
        height: item.height * scale,
        font_size: item.height * scale,
    }
}

/// Normalize every item of a page, preserving appearance order.
pub fn normalize_items(items: &[RawTextItem], viewport_height: f64, scale: f64) -> Vec<Token> {
    items
        .iter()
        .map(|item| normalize_item(item, viewport_height, scale))
        .collect()
}
