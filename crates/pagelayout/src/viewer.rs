//! Page-at-a-time viewing session with click-style selection.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::images::TextRecognizer;
use crate::types::{BlockKind, PageResult, RawDocument};
use crate::{analyze_page, LayoutError};

/// What a vertical position on the current page resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub kind: BlockKind,
    pub text: String,
    pub font_size: Option<f64>,
}

/// A document opened for viewing one page at a time.
///
/// The analysis of the current page is computed on demand and cached until
/// the page or the scale changes.
pub struct PageViewer<'r> {
    doc: RawDocument,
    config: LayoutConfig,
    recognizer: &'r dyn TextRecognizer,
    page: usize,
    scale: f64,
    cached: Option<PageResult>,
}

impl<'r> PageViewer<'r> {
    /// Open `doc` on its first page at the configured default scale.
    pub fn new(doc: RawDocument, config: LayoutConfig, recognizer: &'r dyn TextRecognizer) -> Self {
        let scale = config.default_scale;
        PageViewer {
            doc,
            config,
            recognizer,
            page: 1,
            scale,
            cached: None,
        }
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.doc.pages.len()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Advance one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.page >= self.page_count() {
            return false;
        }
        self.page += 1;
        self.cached = None;
        true
    }

    /// Go back one page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.cached = None;
        true
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<(), LayoutError> {
        if page == 0 || page > self.page_count() {
            return Err(LayoutError::PageOutOfRange {
                page,
                count: self.page_count(),
            });
        }
        if page != self.page {
            self.page = page;
            self.cached = None;
        }
        Ok(())
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<(), LayoutError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(LayoutError::InvalidScale(scale));
        }
        self.scale = scale;
        self.cached = None;
        Ok(())
    }

    /// Analysis of the current page, or `None` for an empty document.
    pub fn analysis(&mut self) -> Option<&PageResult> {
        if self.cached.is_none() {
            let raw = self.doc.pages.get(self.page - 1)?;
            debug!("analyzing page {} at scale {}", self.page, self.scale);
            self.cached = Some(analyze_page(raw, self.scale, &self.config, self.recognizer));
        }
        self.cached.as_ref()
    }

    /// Resolve a display-space y coordinate on the current page.
    pub fn select_at(&mut self, y: f64) -> Option<Selection> {
        let block = self.analysis()?.block_at(y)?;
        Some(Selection {
            kind: block.kind(),
            text: block.text(),
            font_size: block.font_size(),
        })
    }
}
