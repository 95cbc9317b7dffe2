//! Resume fit library: score how well a resume matches a job description

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod insights;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeFitError};
pub use processing::analyzer::{AnalysisEngine, AnalysisResult, AnalysisStage, ProgressObserver};
