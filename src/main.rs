//! Resume fit: score a resume against a job description

use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_fit::cli::{self, Cli, Commands, ConfigAction};
use resume_fit::config::{Config, OutputFormat};
use resume_fit::error::{Result, ResumeFitError};
use resume_fit::input::manager::{InputManager, ResumeInput};
use resume_fit::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use resume_fit::output::report::{FitReport, ReportMetadata};
use resume_fit::processing::analyzer::{AnalysisEngine, AnalysisStage, ProgressObserver};
use resume_fit::processing::skill_matcher::SkillMatcher;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, Instant};
use unicode_segmentation::UnicodeSegmentation;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match cli::load_config(&cli.command, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

/// Spinner that shows the running analysis stage
struct SpinnerProgress {
    bar: ProgressBar,
}

impl SpinnerProgress {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for SpinnerProgress {
    fn on_stage(&self, stage: AnalysisStage) {
        self.bar.set_message(stage.description());
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            job_text,
            output,
            save,
            weights,
            no_insights,
            detailed,
        } => {
            info!("Starting resume fit analysis");

            cli::validate_file_extension(&resume, cli::RESUME_EXTENSIONS)
                .map_err(|e| ResumeFitError::InvalidInput(format!("Resume file: {}", e)))?;

            let output_format = match &output {
                Some(format) => cli::parse_output_format(format).map_err(ResumeFitError::InvalidInput)?,
                None => config.output.format,
            };
            let detailed = detailed || config.output.detailed;

            let mut engine = AnalysisEngine::from_config(&config)?;
            if let Some(preset) = &weights {
                let preset = cli::parse_weight_preset(preset).map_err(ResumeFitError::InvalidInput)?;
                engine = engine.with_weights(preset);
            }
            if no_insights {
                info!("External insights disabled");
                engine = engine.without_insights();
            }

            let input_manager = InputManager::new();
            let (job_description, job_source) = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, cli::JOB_EXTENSIONS)
                        .map_err(|e| ResumeFitError::InvalidInput(format!("Job description file: {}", e)))?;
                    let text = input_manager.extract_text(&path).await?;
                    (text, path.display().to_string())
                }
                (None, Some(text)) => (text, "inline".to_string()),
                (None, None) => {
                    return Err(ResumeFitError::InvalidInput(
                        "Provide a job description with --job or --job-text".to_string(),
                    ))
                }
            };
            let resume_input = input_manager.load_resume(&resume).await?;

            if detailed {
                println!("Job description preview:\n{}\n", truncate_text(&job_description, 300));
            }

            let start = Instant::now();
            let progress = SpinnerProgress::new();
            let result = match &resume_input {
                ResumeInput::Document(bytes) => engine.analyze_document(&job_description, bytes, &progress).await,
                ResumeInput::Text(text) => Ok(engine.analyze_text(&job_description, text, &progress).await),
            };
            progress.finish();
            let result = result?;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            info!("Analysis finished in {}ms with fit score {}", elapsed_ms, result.fit_score);

            let metadata = ReportMetadata::new(resume.display().to_string(), job_source, elapsed_ms);
            let report = FitReport::from_analysis(&result, engine.weights(), metadata);

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            println!("{}", generator.generate_report(&report, output_format)?);

            if let Some(save_path) = save {
                let save_path = resolve_save_path(save_path, output_format, &resume);
                // Files never carry terminal color codes
                let plain = ReportGenerator::with_options(false, detailed, true, true);
                let content = plain.generate_report(&report, output_format)?;
                save_report_to_file(&content, &save_path)
                    .with_context(|| format!("Failed to save report to {}", save_path.display()))?;
                println!("Report saved to {}", save_path.display());
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => {
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| ResumeFitError::Configuration(format!("Failed to render config: {}", e)))?;
                    println!("# {}\n{}", path.display(), rendered);
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset to defaults at {}", path.display());
                }

                Some(ConfigAction::Set { key, value }) => {
                    let mut updated = config;
                    updated.set(&key, &value)?;
                    updated.save_to(&path)?;
                    println!("Set {} = {}", key, value);
                }
            }
        }

        Commands::Vocabulary => {
            let matcher = SkillMatcher::new()?;
            println!("Skill vocabulary ({} terms):", matcher.skill_count());
            for skill in matcher.vocabulary() {
                println!("  • {}", skill);
            }
        }
    }

    Ok(())
}

/// A directory target gets a generated file name
fn resolve_save_path(save_path: PathBuf, format: OutputFormat, resume: &Path) -> PathBuf {
    if save_path.is_dir() {
        save_path.join(suggest_filename(format, &resume.to_string_lossy()))
    } else {
        save_path
    }
}

/// Truncate on a word boundary without splitting graphemes
fn truncate_text(text: &str, max_graphemes: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_graphemes {
        return text.to_string();
    }

    let truncated = graphemes[..max_graphemes].concat();
    let cut = truncated.rfind(char::is_whitespace).unwrap_or(truncated.len());
    format!("{}...", truncated[..cut].trim_end())
}
