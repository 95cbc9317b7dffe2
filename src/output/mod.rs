//! Report building and rendering

pub mod formatter;
pub mod report;

pub use formatter::{OutputFormatter, ReportGenerator};
pub use report::{FitReport, ReportMetadata};
