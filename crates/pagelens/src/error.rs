#[derive(thiserror::Error, Debug, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Invalid input document {path}: {message}")]
    InvalidInput { path: String, message: String },

    #[error("Document {0} has no pages")]
    EmptyDocument(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),
}
