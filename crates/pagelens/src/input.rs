//! Loading page dumps and layout configuration from disk.

use std::path::Path;

use pagelayout::config::LayoutConfig;
use pagelayout::RawDocument;

use crate::prelude::{eprintln, *};

/// Read a JSON page dump produced by the rendering service.
pub fn load_document(path: &Path) -> Result<RawDocument> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| f!("Failed to read {}", path.display()))?;

    let doc: RawDocument = serde_json::from_str(&raw).map_err(|e| Error::InvalidInput {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if doc.pages.is_empty() {
        return Err(Error::EmptyDocument(path.display().to_string()).into());
    }

    Ok(doc)
}

/// Layout configuration from `--config`, or the defaults.
pub fn load_config(global: &crate::Global) -> Result<LayoutConfig> {
    let Some(path) = &global.config else {
        return Ok(LayoutConfig::default());
    };

    if global.verbose {
        eprintln!("Loading layout configuration from {}", path.display());
    }

    LayoutConfig::load(path).map_err(|e| eyre!("Invalid configuration {}: {e}", path.display()))
}
