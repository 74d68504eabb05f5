use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw input from the rendering service
// ---------------------------------------------------------------------------

/// Every page of a rendered document, as dumped by the rendering service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub pages: Vec<RawPage>,
}

/// One page worth of raw text items and embedded images.
///
/// Coordinates are in page space: the origin is the bottom-left corner and
/// y grows upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPage {
    pub page_number: usize,
    pub viewport_height: f64,
    #[serde(default)]
    pub items: Vec<RawTextItem>,
    #[serde(default)]
    pub images: Vec<RawImage>,
}

/// A single text run as reported by the rendering service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextItem {
    #[serde(rename = "str")]
    pub text: String,
    /// Affine transform `[scaleX, skewX, skewY, scaleY, x, y]`.
    pub transform: [f64; 6],
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// An embedded raster image encountered while walking the page's drawing
/// operations. `data` holds RGBA pixels, base64 encoded on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawImage {
    pub name: String,
    pub transform: [f64; 6],
    pub width: u32,
    pub height: u32,
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Layout model
// ---------------------------------------------------------------------------

/// A positioned run of text in display space (top-left origin, y grows
/// downward).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub font_size: f64,
}

/// Tokens sharing a quantized vertical position, ordered left-to-right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub y: f64,
    pub tokens: Vec<Token>,
    pub text: String,
    pub avg_font_size: f64,
    pub item_count: usize,
    /// Mean horizontal distance between consecutive token origins.
    pub spacing: f64,
}

impl Line {
    /// Build a line from tokens at representative position `y`.
    ///
    /// Tokens are re-sorted by ascending x; the sort is stable so tokens
    /// sharing an x keep their input order.
    pub fn new(y: f64, mut tokens: Vec<Token>) -> Self {
        tokens.sort_by(|a, b| a.x.total_cmp(&b.x));

        let item_count = tokens.len();
        let text = tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let avg_font_size = if item_count == 0 {
            0.0
        } else {
            tokens.iter().map(|t| t.font_size).sum::<f64>() / item_count as f64
        };
        let spacing = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) if item_count > 1 => {
                (last.x - first.x) / (item_count - 1) as f64
            }
            _ => 0.0,
        };

        Line {
            y,
            tokens,
            text,
            avg_font_size,
            item_count,
            spacing,
        }
    }
}

/// Semantic classification of a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Header,
    Table,
    Paragraph,
    Text,
    Image,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Header => write!(f, "header"),
            BlockKind::Table => write!(f, "table"),
            BlockKind::Paragraph => write!(f, "paragraph"),
            BlockKind::Text => write!(f, "text"),
            BlockKind::Image => write!(f, "image"),
        }
    }
}

/// Row/column cell matrix of a detected table.
///
/// Always holds at least two rows whose cell counts differ by at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableGrid {
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `(min, max)` cell count across rows.
    pub fn column_range(&self) -> (usize, usize) {
        let min = self.rows.iter().map(Vec::len).min().unwrap_or(0);
        let max = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        (min, max)
    }
}

/// Handle to an embedded image: its resource name and a PNG data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub uri: String,
}

/// Kind-specific payload of a [`Block`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockContent {
    Header {
        text: String,
    },
    Table {
        /// `None` when the grid extractor rejected the block's tokens.
        grid: Option<TableGrid>,
    },
    Paragraph {
        text: String,
    },
    Text {
        text: String,
    },
    Image {
        text: String,
        image: ImageRef,
        failed: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// A vertically contiguous structural unit of a page.
///
/// Text blocks never overlap each other.  Image blocks are zero-height and
/// may fall inside a text block's `[y_start, y_end]` range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(flatten)]
    pub content: BlockContent,
    pub y_start: f64,
    pub y_end: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<Line>,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self.content {
            BlockContent::Header { .. } => BlockKind::Header,
            BlockContent::Table { .. } => BlockKind::Table,
            BlockContent::Paragraph { .. } => BlockKind::Paragraph,
            BlockContent::Text { .. } => BlockKind::Text,
            BlockContent::Image { .. } => BlockKind::Image,
        }
    }

    /// Line texts joined by newlines, or the recognized text of an image.
    pub fn text(&self) -> String {
        match &self.content {
            BlockContent::Image { text, .. } => text.clone(),
            _ => self
                .lines
                .iter()
                .map(|l| l.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Average font size of the block's first line.
    pub fn font_size(&self) -> Option<f64> {
        self.lines.first().map(|l| l.avg_font_size)
    }

    pub fn contains(&self, y: f64) -> bool {
        self.y_start <= y && y <= self.y_end
    }
}

/// The analyzed layout of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub page_number: usize,
    pub blocks: Vec<Block>,
}

impl PageResult {
    /// The block containing vertical position `y`, if any.
    pub fn block_at(&self, y: f64) -> Option<&Block> {
        crate::hit::hit_test(&self.blocks, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(text: &str, x: f64) -> Token {
        Token {
            text: text.to_string(),
            x,
            y: 100.0,
            width: 10.0,
            height: 10.0,
            font_size: 10.0,
        }
    }

    #[test]
    fn test_line_sorts_tokens_and_joins_text() {
        let line = Line::new(100.0, vec![token("world", 60.0), token("hello", 10.0)]);
        assert_eq!(line.text, "hello world");
        assert_eq!(line.item_count, 2);
        assert!((line.spacing - 50.0).abs() < f64::EPSILON);
        assert!((line.avg_font_size - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_line_single_token_spacing_is_zero() {
        let line = Line::new(100.0, vec![token("solo", 42.0)]);
        assert_eq!(line.spacing, 0.0);
        assert!(!line.spacing.is_nan());
    }

    #[test]
    fn test_line_spacing_is_mean_gap() {
        let line = Line::new(
            0.0,
            vec![token("a", 0.0), token("b", 30.0), token("c", 90.0)],
        );
        assert!((line.spacing - 45.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_block_kind_display() {
        assert_eq!(format!("{}", BlockKind::Header), "header");
        assert_eq!(format!("{}", BlockKind::Image), "image");
    }

    #[test]
    fn test_table_grid_column_range() {
        let grid = TableGrid {
            rows: vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["d".into(), "e".into()],
            ],
        };
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_range(), (2, 3));
    }

    #[test]
    fn test_block_serializes_kind_tag() {
        let block = Block {
            content: BlockContent::Header {
                text: "Title".to_string(),
            },
            y_start: 10.0,
            y_end: 10.0,
            lines: Vec::new(),
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "header");
        assert_eq!(json["text"], "Title");
        assert_eq!(json["yStart"], 10.0);
        assert!(json.get("lines").is_none());
    }

    #[test]
    fn test_raw_page_deserializes_camel_case() {
        let json = r#"{
            "pageNumber": 2,
            "viewportHeight": 792.0,
            "items": [
                { "str": "Hello", "transform": [12, 0, 0, 12, 72, 700], "width": 30, "height": 12 }
            ],
            "images": [
                { "name": "img0", "transform": [1, 0, 0, 1, 0, 0], "width": 1, "height": 1, "data": "AAAA/w==" }
            ]
        }"#;
        let page: RawPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page_number, 2);
        assert_eq!(page.items[0].text, "Hello");
        assert_eq!(page.items[0].transform[5], 700.0);
        assert_eq!(page.images[0].data, vec![0, 0, 0, 255]);
    }

    #[test]
    fn test_raw_page_defaults_missing_collections() {
        let page: RawPage =
            serde_json::from_str(r#"{ "pageNumber": 1, "viewportHeight": 100 }"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.images.is_empty());
    }
}
