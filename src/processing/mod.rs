//! Text processing and analysis module

pub mod analyzer;
pub mod scoring;
pub mod skill_matcher;
pub mod text_processor;

pub use analyzer::{AnalysisEngine, AnalysisResult, AnalysisStage, EnrichmentStatus, NoProgress, ProgressObserver};
pub use scoring::{FitBucket, FitWeights};
