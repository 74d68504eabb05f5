//! Text recognition through the `tesseract` command-line engine.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use pagelayout::images::{NoRecognizer, OcrError, TextRecognizer};

use crate::prelude::*;

/// Pipes PNG bytes through `tesseract stdin stdout`.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    binary: PathBuf,
}

impl TesseractRecognizer {
    /// Find `tesseract` on the `PATH`.
    pub fn locate() -> Result<Self, OcrError> {
        let binary = which::which("tesseract")
            .map_err(|e| OcrError::Unavailable(format!("tesseract not found: {e}")))?;
        log::debug!("using OCR engine at {}", binary.display());
        Ok(Self { binary })
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, png: &[u8]) -> Result<String, OcrError> {
        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::Unavailable(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(png)
                .map_err(|e| OcrError::Engine(format!("failed to send image: {e}")))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| OcrError::Engine(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Engine(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// The recognizer to run images through: tesseract when `ocr` is set,
/// otherwise one that recognizes nothing.
pub fn recognizer(ocr: bool) -> Result<Box<dyn TextRecognizer>> {
    if !ocr {
        return Ok(Box::new(NoRecognizer));
    }
    let tesseract =
        TesseractRecognizer::locate().map_err(|e| Error::OcrUnavailable(e.to_string()))?;
    Ok(Box::new(tesseract))
}
