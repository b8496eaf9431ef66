//! Input manager routing files to the matching extractor

use crate::error::{Result, ResumeMatchError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::path::Path;

pub struct InputManager {
    allowed: Vec<FileType>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            allowed: vec![FileType::Pdf, FileType::Text, FileType::Markdown],
        }
    }

    /// Restrict accepted formats, e.g. job descriptions as text only
    pub fn with_allowed(mut self, allowed: &[FileType]) -> Self {
        self.allowed = allowed.to_vec();
        self
    }

    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(ResumeMatchError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = FileType::from_path(path);
        if file_type == FileType::Unknown || !self.allowed.contains(&file_type) {
            return Err(ResumeMatchError::UnsupportedFormat(format!(
                "{} (expected one of: {})",
                path.display(),
                self.allowed_extensions().join(", ")
            )));
        }

        let text = match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Text | FileType::Unknown => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
        };

        Ok(text)
    }

    fn allowed_extensions(&self) -> Vec<&'static str> {
        self.allowed
            .iter()
            .map(|t| match t {
                FileType::Pdf => "pdf",
                FileType::Text => "txt",
                FileType::Markdown => "md",
                FileType::Unknown => "?",
            })
            .collect()
    }
}
