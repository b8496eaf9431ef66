//! Error handling for the resume matching engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Keyword extraction error: {0}")]
    Extraction(String),

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeMatchError>;

/// The Model2Vec loader reports failures through anyhow
impl From<anyhow::Error> for ResumeMatchError {
    fn from(err: anyhow::Error) -> Self {
        ResumeMatchError::ModelError(err.to_string())
    }
}
