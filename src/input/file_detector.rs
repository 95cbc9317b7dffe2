//! File type detection

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Sniff the payload header. Only PDF has a reliable signature.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // Some writers emit a few junk bytes before the header
        let window = &bytes[..bytes.len().min(1024)];
        if window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC) {
            FileType::Pdf
        } else {
            FileType::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileType::from_extension("PDF"), FileType::Pdf);
        assert_eq!(FileType::from_extension("markdown"), FileType::Markdown);
        assert_eq!(FileType::from_extension("txt"), FileType::Text);
        assert_eq!(FileType::from_extension("docx"), FileType::Unknown);
    }

    #[test]
    fn test_from_bytes() {
        assert_eq!(FileType::from_bytes(b"%PDF-1.4\n%..."), FileType::Pdf);
        assert_eq!(FileType::from_bytes(b"\n\n%PDF-1.7"), FileType::Pdf);
        assert_eq!(FileType::from_bytes(b"PK\x03\x04"), FileType::Unknown);
        assert_eq!(FileType::from_bytes(b""), FileType::Unknown);
    }
}
