use serde::{Deserialize, Serialize};
use thiserror::Error;

use config::LayoutConfig;
use images::TextRecognizer;

pub mod config;
pub mod content;
pub mod hit;
pub mod images;
pub mod parser;
pub mod render;
pub mod types;
pub mod viewer;

pub use types::*;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Invalid scale: {0} (must be a finite number greater than zero)")]
    InvalidScale(f64),
    #[error("Page {page} out of range (document has {count} pages)")]
    PageOutOfRange { page: usize, count: usize },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Image error: {0}")]
    Image(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Page Results for every page of a document plus its full raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResult {
    pub pages: Vec<PageResult>,
    /// Each page's token texts joined by spaces, every page followed by a
    /// blank line.
    pub text: String,
}

/// Run the full layout pipeline over one page at display scale `scale`.
///
/// Text items are normalized, clustered into lines, segmented into blocks
/// and classified; embedded images are then resolved through `recognizer`
/// and merged into the block sequence by vertical position.
pub fn analyze_page(
    page: &RawPage,
    scale: f64,
    config: &LayoutConfig,
    recognizer: &dyn TextRecognizer,
) -> PageResult {
    let tokens = parser::normalize::normalize_items(&page.items, page.viewport_height, scale);
    let lines = parser::layout::cluster_lines(tokens, config);
    let segments = parser::layout::segment_lines(lines, config);
    let mut blocks = parser::classify::build_blocks(segments, config);

    let resolved = images::resolve_images(page, scale, recognizer);
    images::insert_image_blocks(&mut blocks, resolved);

    log::debug!(
        "page {}: {} blocks at scale {scale}",
        page.page_number,
        blocks.len()
    );

    PageResult {
        page_number: page.page_number,
        blocks,
    }
}

/// Analyze every page of a document at scale 1.0 and collect its raw text.
pub fn process_document(
    doc: &RawDocument,
    config: &LayoutConfig,
    recognizer: &dyn TextRecognizer,
) -> DocumentResult {
    let mut pages = Vec::with_capacity(doc.pages.len());
    let mut text = String::new();

    for page in &doc.pages {
        pages.push(analyze_page(page, 1.0, config, recognizer));
        text.push_str(&page_text(page));
        text.push_str("\n\n");
    }

    DocumentResult { pages, text }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// A page's text items joined by spaces, in appearance order.
fn page_text(page: &RawPage) -> String {
    page.items
        .iter()
        .map(|item| item.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NoRecognizer;

    fn item(text: &str, x: f64, y: f64, height: f64) -> RawTextItem {
        RawTextItem {
            text: text.to_string(),
            transform: [height, 0.0, 0.0, height, x, y],
            width: text.len() as f64 * height * 0.5,
            height,
        }
    }

    fn page(page_number: usize, items: Vec<RawTextItem>) -> RawPage {
        RawPage {
            page_number,
            viewport_height: 800.0,
            items,
            images: Vec::new(),
        }
    }

    #[test]
    fn test_analyze_page_empty() {
        let result = analyze_page(&page(1, Vec::new()), 1.0, &LayoutConfig::default(), &NoRecognizer);
        assert_eq!(result.page_number, 1);
        assert!(result.blocks.is_empty());
    }

    #[test]
    fn test_analyze_page_header_then_body() {
        let items = vec![
            item("Chapter One", 50.0, 700.0, 20.0),
            item("some body text", 50.0, 600.0, 10.0),
        ];
        let result = analyze_page(&page(1, items), 1.0, &LayoutConfig::default(), &NoRecognizer);
        assert_eq!(result.blocks.len(), 2);
        assert_eq!(result.blocks[0].kind(), BlockKind::Header);
        assert_eq!(result.blocks[0].y_start, 100.0);
        assert_eq!(result.blocks[1].kind(), BlockKind::Text);
        assert_eq!(result.blocks[1].y_start, 200.0);
    }

    #[test]
    fn test_analyze_page_applies_scale() {
        let items = vec![item("body", 50.0, 700.0, 10.0)];
        let result = analyze_page(&page(1, items), 2.0, &LayoutConfig::default(), &NoRecognizer);
        assert_eq!(result.blocks[0].y_start, 200.0);
        assert_eq!(result.blocks[0].font_size(), Some(20.0));
    }

    #[test]
    fn test_process_document_text() {
        let doc = RawDocument {
            pages: vec![
                page(1, vec![item("Hello", 0.0, 700.0, 10.0), item("world", 40.0, 700.0, 10.0)]),
                page(2, vec![item("Bye", 0.0, 700.0, 10.0)]),
            ],
        };
        let result = process_document(&doc, &LayoutConfig::default(), &NoRecognizer);
        assert_eq!(result.pages.len(), 2);
        assert_eq!(result.pages[1].page_number, 2);
        assert_eq!(result.text, "Hello world\n\nBye\n\n");
    }

    #[test]
    fn test_process_document_empty_page_still_terminated() {
        let doc = RawDocument {
            pages: vec![page(1, Vec::new())],
        };
        let result = process_document(&doc, &LayoutConfig::default(), &NoRecognizer);
        assert_eq!(result.text, "\n\n");
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::PageOutOfRange { page: 5, count: 3 };
        assert_eq!(err.to_string(), "Page 5 out of range (document has 3 pages)");
    }
}
