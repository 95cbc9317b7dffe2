//! CLI interface for the resume fit analyzer

use crate::config::{Config, OutputFormat};
use crate::error::ResumeFitError;
use crate::processing::scoring::FitWeights;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-fit")]
#[command(about = "Score how well a resume fits a job description")]
#[command(long_about = "Score resume and job description fit using term-frequency similarity and skill matching, with optional external insights")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze resume fit against a job description
    Analyze {
        /// Path to resume file (PDF, or already extracted TXT/MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long, conflicts_with = "job_text", required_unless_present = "job_text")]
        job: Option<PathBuf>,

        /// Job description text given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Output format: console, json, markdown, text
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Weight preset: skill-dominant, similarity-dominant
        #[arg(short, long)]
        weights: Option<String>,

        /// Skip the external insight provider (rule-based output only)
        #[arg(long)]
        no_insights: bool,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// List the skill vocabulary used for matching
    Vocabulary,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.skill_weight")
        key: String,

        /// Configuration value
        value: String,
    },
}

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];
pub const JOB_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "pdf"];

/// Load the configuration a command runs with.
///
/// `config reset` and `config path` never read the file, and `config set` reads it
/// without validation, so an invalid file can still be repaired.
pub fn load_config(command: &Commands, path: Option<&Path>) -> Result<Config, ResumeFitError> {
    match command {
        Commands::Config {
            action: Some(ConfigAction::Reset | ConfigAction::Path),
        } => Ok(Config::default()),
        Commands::Config {
            action: Some(ConfigAction::Set { .. }),
        } => {
            let path = path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);
            Ok(Config::load_for_repair(&path))
        }
        _ => Config::load(path),
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "text" | "txt" => Ok(OutputFormat::Text),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, text", format)),
    }
}

/// Parse a named weight preset
pub fn parse_weight_preset(preset: &str) -> Result<FitWeights, String> {
    FitWeights::preset(preset).ok_or_else(|| {
        format!(
            "Invalid weight preset: {}. Supported: skill-dominant, similarity-dominant",
            preset
        )
    })
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
