//! Error handling for the resume fit analyzer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeFitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to extract text from document: {0}. Please provide a valid PDF document")]
    Extraction(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

pub type Result<T> = std::result::Result<T, ResumeFitError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeFitError {
    fn from(err: anyhow::Error) -> Self {
        ResumeFitError::AnalysisFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_error_is_user_facing() {
        let err = ResumeFitError::Extraction("invalid header".to_string());
        let message = err.to_string();

        assert!(message.contains("invalid header"));
        assert!(message.contains("provide a valid PDF"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ResumeFitError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ResumeFitError::AnalysisFailed(ref m) if m == "boom"));
    }
}
