//! Input manager for handling different file types

use crate::error::{Result, ResumeFitError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor};
use log::info;
use std::path::Path;

/// A resume as read from disk: raw PDF bytes, or text that needs no extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeInput {
    Document(Vec<u8>),
    Text(String),
}

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read a job description file into text
    pub async fn extract_text(&self, path: &Path) -> Result<String> {
        Self::ensure_exists(path)?;

        match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                PdfExtractor.extract(path).await
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Unknown => Err(ResumeFitError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
        }
    }

    /// Read a resume file. PDFs are returned unextracted so the analyzer owns extraction.
    pub async fn load_resume(&self, path: &Path) -> Result<ResumeInput> {
        Self::ensure_exists(path)?;

        match self.detect_file_type(path)? {
            FileType::Pdf => {
                info!("Reading resume document: {}", path.display());
                let bytes = tokio::fs::read(path).await?;
                Ok(ResumeInput::Document(bytes))
            }
            FileType::Text | FileType::Markdown => {
                let text = self.extract_text(path).await?;
                Ok(ResumeInput::Text(text))
            }
            FileType::Unknown => Err(ResumeFitError::UnsupportedFormat(format!(
                "Unsupported resume type for: {}",
                path.display()
            ))),
        }
    }

    fn ensure_exists(path: &Path) -> Result<()> {
        if path.exists() {
            Ok(())
        } else {
            Err(ResumeFitError::InvalidInput(format!("File does not exist: {}", path.display())))
        }
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ResumeFitError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        Ok(FileType::from_extension(extension))
    }
}
