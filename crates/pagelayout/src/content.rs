//! Document-wide views over one content type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::parser::normalize::normalize_items;
use crate::parser::table::scan_windows;
use crate::types::{BlockContent, RawDocument, TableGrid};
use crate::DocumentResult;

/// Which slice of a document to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Tables,
    Paragraphs,
    Text,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Tables => write!(f, "tables"),
            ContentType::Paragraphs => write!(f, "paragraphs"),
            ContentType::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tables" => Ok(ContentType::Tables),
            "paragraphs" => Ok(ContentType::Paragraphs),
            "text" => Ok(ContentType::Text),
            other => Err(format!(
                "unknown content type '{other}' (expected tables, paragraphs or text)"
            )),
        }
    }
}

/// A grid found by the window scan, tagged with where it was found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTable {
    pub page_number: usize,
    pub offset: usize,
    pub grid: TableGrid,
}

/// A Paragraph block, tagged with its page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParagraph {
    pub page_number: usize,
    pub text: String,
    pub font_size: f64,
}

/// Every table, paragraph and the raw text of a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    pub tables: Vec<PageTable>,
    pub paragraphs: Vec<PageParagraph>,
    pub text: String,
}

impl ContentView {
    /// Build the view from a document and its processed result.
    ///
    /// Tables come from the whole-page window scan over each page's tokens
    /// (at scale 1.0, in appearance order), independently of how blocks were
    /// classified.  Paragraphs and text come from `result`.
    pub fn build(doc: &RawDocument, result: &DocumentResult, config: &LayoutConfig) -> Self {
        let tables = doc
            .pages
            .iter()
            .flat_map(|page| {
                let tokens = normalize_items(&page.items, page.viewport_height, 1.0);
                scan_windows(&tokens, config)
                    .into_iter()
                    .map(move |table| PageTable {
                        page_number: page.page_number,
                        offset: table.offset,
                        grid: table.grid,
                    })
            })
            .collect();

        let paragraphs = result
            .pages
            .iter()
            .flat_map(|page| {
                page.blocks.iter().filter_map(move |block| match &block.content {
                    BlockContent::Paragraph { text } => Some(PageParagraph {
                        page_number: page.page_number,
                        text: text.clone(),
                        font_size: block.font_size().unwrap_or(0.0),
                    }),
                    _ => None,
                })
            })
            .collect();

        ContentView {
            tables,
            paragraphs,
            text: result.text.clone(),
        }
    }

    /// Keep only the part of the view selected by `content_type`.
    pub fn select(self, content_type: ContentType) -> Self {
        match content_type {
            ContentType::Tables => ContentView {
                tables: self.tables,
                ..Default::default()
            },
            ContentType::Paragraphs => ContentView {
                paragraphs: self.paragraphs,
                ..Default::default()
            },
            ContentType::Text => ContentView {
                text: self.text,
                ..Default::default()
            },
        }
    }
}
