//! Text extraction from various file formats

use crate::error::{Result, ResumeFitError};
use crate::input::file_detector::FileType;
use log::debug;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

/// Extract the plain text of a PDF payload.
///
/// Pages are read in order and joined with a single space. A payload that is
/// not a well-formed PDF yields [`ResumeFitError::Extraction`]; a PDF without
/// any text layer yields an empty string.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String> {
    if FileType::from_bytes(bytes) != FileType::Pdf {
        return Err(ResumeFitError::Extraction("payload is not a PDF document".to_string()));
    }

    // pdf-extract panics on some malformed font and xref tables
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|_| ResumeFitError::Extraction("PDF structure could not be parsed".to_string()))?
        .map_err(|e| ResumeFitError::Extraction(e.to_string()))?;

    debug!("Extracted {} page(s) from PDF payload", pages.len());
    Ok(pages.join(" "))
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        extract_pdf_text(&bytes).map_err(|e| match e {
            ResumeFitError::Extraction(reason) => {
                ResumeFitError::Extraction(format!("'{}': {}", path.display(), reason))
            }
            other => other,
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(Self::markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    /// Strip Markdown syntax, keeping one line per block
    pub fn markdown_to_text(markdown: &str) -> String {
        let mut text = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
