use std::io::Cursor;

use base64::Engine;
use log::{debug, warn};
use thiserror::Error;

use crate::types::{Block, BlockContent, ImageRef, RawImage, RawPage};
use crate::LayoutError;

// ---------------------------------------------------------------------------
// OCR boundary
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// Recognizes text in a PNG-encoded image.
///
/// Implementations wrap an external OCR engine; the layout pipeline only
/// carries the returned string.
pub trait TextRecognizer {
    fn recognize(&self, png: &[u8]) -> Result<String, OcrError>;
}

/// Recognizer that never finds any text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecognizer;

impl TextRecognizer for NoRecognizer {
    fn recognize(&self, _png: &[u8]) -> Result<String, OcrError> {
        Ok(String::new())
    }
}

// ---------------------------------------------------------------------------
// Pixel handling
// ---------------------------------------------------------------------------

/// Pixel layout inferred from the buffer length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PixelLayout {
    Gray,
    Rgb,
    Rgba,
}

fn pixel_layout(raw: &RawImage) -> Option<PixelLayout> {
    let pixels = raw.width as usize * raw.height as usize;
    if pixels == 0 {
        return None;
    }
    match raw.data.len() {
        n if n == pixels * 4 => Some(PixelLayout::Rgba),
        n if n == pixels * 3 => Some(PixelLayout::Rgb),
        n if n == pixels => Some(PixelLayout::Gray),
        _ => None,
    }
}

/// Re-encode raw pixel data as PNG.
pub fn encode_png(raw: &RawImage) -> Result<Vec<u8>, LayoutError> {
    let layout = pixel_layout(raw).ok_or_else(|| {
        LayoutError::Image(format!(
            "{}: {} bytes do not match a {}x{} gray, RGB or RGBA buffer",
            raw.name,
            raw.data.len(),
            raw.width,
            raw.height
        ))
    })?;

    let (width, height, pixels) = (raw.width, raw.height, raw.data.clone());
    let malformed = || LayoutError::Image(format!("{}: malformed pixel buffer", raw.name));

    let dyn_image = match layout {
        PixelLayout::Gray => image::DynamicImage::ImageLuma8(
            image::GrayImage::from_raw(width, height, pixels).ok_or_else(malformed)?,
        ),
        PixelLayout::Rgb => image::DynamicImage::ImageRgb8(
            image::RgbImage::from_raw(width, height, pixels).ok_or_else(malformed)?,
        ),
        PixelLayout::Rgba => image::DynamicImage::ImageRgba8(
            image::RgbaImage::from_raw(width, height, pixels).ok_or_else(malformed)?,
        ),
    };

    let mut buf = Vec::new();
    dyn_image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| LayoutError::Image(format!("{}: {e}", raw.name)))?;
    Ok(buf)
}

/// Wrap PNG bytes in a `data:` URI.
pub fn png_data_uri(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(png)
    )
}

// ---------------------------------------------------------------------------
// Image blocks
// ---------------------------------------------------------------------------

/// An embedded image after encoding and text recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    /// Display-space vertical position.
    pub y: f64,
    pub text: String,
    pub image: ImageRef,
    /// Why encoding or recognition failed, if it did.
    pub error: Option<String>,
}

impl ResolvedImage {
    pub fn into_block(self) -> Block {
        Block {
            content: BlockContent::Image {
                text: self.text,
                image: self.image,
                failed: self.error.is_some(),
                error: self.error,
            },
            y_start: self.y,
            y_end: self.y,
            lines: Vec::new(),
        }
    }
}

/// Encode one image and run it through `recognizer`.
///
/// Failures are recorded on the result instead of being returned, so one
/// broken image never costs the rest of the page.
pub fn resolve_image(
    raw: &RawImage,
    viewport_height: f64,
    scale: f64,
    recognizer: &dyn TextRecognizer,
) -> ResolvedImage {
    let y = (viewport_height - raw.transform[5]) * scale;

    let (uri, result) = match encode_png(raw) {
        Ok(png) => {
            let uri = png_data_uri(&png);
            let text = recognizer.recognize(&png).map_err(|e| e.to_string());
            (uri, text)
        }
        Err(e) => (String::new(), Err(e.to_string())),
    };

    let (text, error) = match result {
        Ok(text) => (text, None),
        Err(message) => {
            warn!("image {} could not be read: {message}", raw.name);
            (String::new(), Some(message))
        }
    };

    ResolvedImage {
        y,
        text,
        image: ImageRef {
            name: raw.name.clone(),
            uri,
        },
        error,
    }
}

/// Resolve every embedded image of a page, in drawing order.
pub fn resolve_images(
    page: &RawPage,
    scale: f64,
    recognizer: &dyn TextRecognizer,
) -> Vec<ResolvedImage> {
    let resolved: Vec<ResolvedImage> = page
        .images
        .iter()
        .map(|raw| resolve_image(raw, page.viewport_height, scale, recognizer))
        .collect();
    debug!(
        "page {}: resolved {} images",
        page.page_number,
        resolved.len()
    );
    resolved
}

/// Merge image blocks into an ordered block sequence.
///
/// Each image lands after every block whose `y_start` is at or above it, so
/// the sequence stays sorted by `y_start` and earlier blocks win ties.
pub fn insert_image_blocks(blocks: &mut Vec<Block>, images: Vec<ResolvedImage>) {
    for image in images {
        let at = blocks.partition_point(|b| b.y_start <= image.y);
        blocks.insert(at, image.into_block());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockKind;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    struct FixedRecognizer(&'static str);

    impl TextRecognizer for FixedRecognizer {
        fn recognize(&self, png: &[u8]) -> Result<String, OcrError> {
            assert_eq!(png[..8], PNG_MAGIC);
            Ok(self.0.to_string())
        }
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _png: &[u8]) -> Result<String, OcrError> {
            Err(OcrError::Engine("exit status 1".to_string()))
        }
    }

    fn raw_image(name: &str, y: f64, width: u32, height: u32, channels: usize) -> RawImage {
        RawImage {
            name: name.to_string(),
            transform: [width as f64, 0.0, 0.0, height as f64, 0.0, y],
            width,
            height,
            data: vec![128; width as usize * height as usize * channels],
        }
    }

    fn text_block(y: f64) -> Block {
        Block {
            content: BlockContent::Text {
                text: format!("at {y}"),
            },
            y_start: y,
            y_end: y,
            lines: Vec::new(),
        }
    }

    // -- encode_png ----------------------------------------------------------

    #[test]
    fn test_encode_rgba_png() {
        let png = encode_png(&raw_image("a", 0.0, 2, 2, 4)).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }

    #[test]
    fn test_encode_rgb_png() {
        let png = encode_png(&raw_image("a", 0.0, 2, 2, 3)).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }

    #[test]
    fn test_encode_gray_png() {
        let png = encode_png(&raw_image("a", 0.0, 3, 1, 1)).unwrap();
        assert_eq!(png[..8], PNG_MAGIC);
    }

    #[test]
    fn test_encode_rejects_wrong_length() {
        let mut image = raw_image("bad", 0.0, 2, 2, 4);
        image.data.pop();
        let err = encode_png(&image).unwrap_err();
        assert!(matches!(err, LayoutError::Image(msg) if msg.starts_with("bad:")));
    }

    #[test]
    fn test_encode_rejects_empty_image() {
        assert!(encode_png(&raw_image("empty", 0.0, 0, 0, 4)).is_err());
    }

    #[test]
    fn test_data_uri_prefix() {
        assert_eq!(png_data_uri(&[1, 2, 3]), "data:image/png;base64,AQID");
    }

    // -- resolve_image -------------------------------------------------------

    #[test]
    fn test_resolve_flips_y_and_keeps_text() {
        let resolved = resolve_image(
            &raw_image("img0", 600.0, 2, 2, 4),
            792.0,
            1.5,
            &FixedRecognizer("INVOICE"),
        );
        assert!((resolved.y - 288.0).abs() < 1e-9);
        assert_eq!(resolved.text, "INVOICE");
        assert!(resolved.error.is_none());
        assert!(resolved.image.uri.starts_with("data:image/png;base64,"));
        assert_eq!(resolved.image.name, "img0");
    }

    #[test]
    fn test_resolve_records_ocr_failure() {
        let resolved = resolve_image(&raw_image("img0", 0.0, 1, 1, 4), 100.0, 1.0, &FailingRecognizer);
        assert_eq!(resolved.text, "");
        assert_eq!(
            resolved.error.as_deref(),
            Some("OCR engine failed: exit status 1")
        );
        // Encoding succeeded, so the image itself is still available.
        assert!(!resolved.image.uri.is_empty());
    }

    #[test]
    fn test_resolve_records_encoding_failure() {
        let mut image = raw_image("img0", 0.0, 2, 2, 4);
        image.data.truncate(5);
        let resolved = resolve_image(&image, 100.0, 1.0, &NoRecognizer);
        assert!(resolved.error.is_some());
        assert!(resolved.image.uri.is_empty());

        let block = resolved.into_block();
        assert!(matches!(block.content, BlockContent::Image { failed: true, .. }));
    }

    #[test]
    fn test_resolve_images_keeps_drawing_order() {
        let page = RawPage {
            page_number: 1,
            viewport_height: 100.0,
            items: Vec::new(),
            images: vec![raw_image("b", 10.0, 1, 1, 4), raw_image("a", 90.0, 1, 1, 4)],
        };
        let resolved = resolve_images(&page, 1.0, &NoRecognizer);
        let names: Vec<_> = resolved.iter().map(|r| r.image.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    // -- insert_image_blocks -------------------------------------------------

    fn resolved_at(y: f64) -> ResolvedImage {
        ResolvedImage {
            y,
            text: "ocr".to_string(),
            image: ImageRef {
                name: format!("img@{y}"),
                uri: String::new(),
            },
            error: None,
        }
    }

    #[test]
    fn test_insert_images_by_position() {
        let mut blocks = vec![text_block(100.0), text_block(200.0)];
        insert_image_blocks(&mut blocks, vec![resolved_at(250.0), resolved_at(50.0), resolved_at(150.0)]);

        let ys: Vec<f64> = blocks.iter().map(|b| b.y_start).collect();
        assert_eq!(ys, vec![50.0, 100.0, 150.0, 200.0, 250.0]);
        assert_eq!(blocks[0].kind(), BlockKind::Image);
        assert_eq!(blocks[1].kind(), BlockKind::Text);
    }

    #[test]
    fn test_insert_image_tie_goes_after_text() {
        let mut blocks = vec![text_block(100.0)];
        insert_image_blocks(&mut blocks, vec![resolved_at(100.0)]);
        assert_eq!(blocks[0].kind(), BlockKind::Text);
        assert_eq!(blocks[1].kind(), BlockKind::Image);
    }

    #[test]
    fn test_image_block_has_no_lines() {
        let block = resolved_at(42.0).into_block();
        assert!(block.lines.is_empty());
        assert_eq!(block.y_start, 42.0);
        assert_eq!(block.y_end, 42.0);
        assert_eq!(block.text(), "ocr");
    }
}
