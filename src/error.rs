use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconstructError {
    #[error("OCR service reported an error (code={code}): {message}")]
    OcrService { code: i64, message: String },

    #[error("malformed OCR response: {0}")]
    MalformedResponse(String),

    #[error("input rejected: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}
