//! Output formatters for console, plain text, Markdown and JSON

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::FitReport;
use crate::processing::analyzer::EnrichmentStatus;
use colored::{Color, Colorize};
use std::path::Path;

const EMPTY_SECTION: &str = "N/A";

pub trait OutputFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Colored terminal output
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// The downloadable plain-text report
pub struct TextFormatter;

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

/// Picks the formatter for an [`OutputFormat`]
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    text_formatter: TextFormatter,
    markdown_formatter: MarkdownFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let (prefix, color) = match level {
            1 => ("█", Color::Blue),
            2 => ("▓", Color::Green),
            _ => ("▒", Color::Yellow),
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8, verdict: &str) -> String {
        let color = match score {
            80..=u8::MAX => Color::Green,
            70..=79 => Color::BrightGreen,
            60..=69 => Color::Yellow,
            50..=59 => Color::BrightYellow,
            _ => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", verdict.color(color).bold())
        } else {
            format!("[{}]", verdict)
        }
    }

    fn format_list(&self, items: &[String], color: Color) -> String {
        if items.is_empty() {
            return format!("  {}\n", self.colorize(EMPTY_SECTION, Color::BrightBlack));
        }
        items
            .iter()
            .map(|item| format!("  • {}\n", self.colorize(item, color)))
            .collect()
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str(&self.format_header("RESUME FIT ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Fit Score: {}% {}\n",
            summary.fit_score,
            self.format_score_badge(summary.fit_score, &summary.verdict)
        ));
        output.push_str(&format!("{}\n", self.colorize(&summary.fit_message, Color::Cyan)));
        output.push_str(&format!(
            "Text similarity: {:.1}% (weight {:.0}%) | Skills matched: {}/{} (weight {:.0}%)\n",
            summary.base_similarity,
            summary.component_weights.similarity_weight * 100.0,
            summary.skill_match.matched,
            summary.skill_match.required,
            summary.component_weights.skill_weight * 100.0
        ));

        output.push_str(&self.format_header("Matched Skills", 3));
        output.push_str(&self.format_list(&report.matched_skills, Color::Green));

        output.push_str(&self.format_header("Missing Skills", 3));
        output.push_str(&self.format_list(&report.missing_skills, Color::Red));

        output.push_str(&self.format_header("Prioritized Missing Skills", 3));
        output.push_str(&self.format_list(&report.ranked_missing_skills, Color::Red));

        output.push_str(&self.format_header("Areas to Highlight", 3));
        output.push_str(&self.format_list(&report.highlight_areas, Color::White));

        output.push_str(&self.format_header("Project Suggestions", 3));
        output.push_str(&self.format_list(&report.project_suggestions, Color::White));

        output.push_str(&self.format_header("General Insights", 2));
        output.push_str(&self.format_list(&report.general_insights, Color::White));

        if !report.job_links.is_empty() {
            output.push_str(&self.format_header("Related Job Searches", 3));
            output.push_str(&self.format_list(&report.job_links, Color::Blue));
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 2));

            output.push_str("Shared keywords:\n");
            if report.top_keywords.is_empty() {
                output.push_str(&format!("  {}\n", EMPTY_SECTION));
            }
            for keyword in &report.top_keywords {
                output.push_str(&format!("  {:<20} {:.4}\n", keyword.word, keyword.score));
            }

            let enrichment = match &report.enrichment {
                EnrichmentStatus::NotConfigured => "not configured".to_string(),
                EnrichmentStatus::Applied => "applied".to_string(),
                EnrichmentStatus::Unavailable { reason } => format!("unavailable ({})", reason),
            };
            output.push_str(&format!("\nExternal insights: {}\n", enrichment));
            output.push_str(&format!(
                "Resume: {} | Job: {}\n",
                report.metadata.resume_file, report.metadata.job_source
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl OutputFormatter for TextFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        let sections: [(&str, &[String]); 5] = [
            ("Matched Skills", &report.matched_skills),
            ("Missing Skills", &report.missing_skills),
            ("Areas to Highlight", &report.highlight_areas),
            ("Project Suggestions", &report.project_suggestions),
            ("General Insights", &report.general_insights),
        ];

        let mut output = String::new();
        output.push_str("Resume Fit Analysis Report\n");
        output.push_str("=========================\n\n");
        output.push_str(&format!("Fit Score: {}%\n", report.summary.fit_score));
        output.push_str(&format!("Fit Message: {}\n", report.summary.fit_message));

        for (title, items) in sections {
            output.push_str(&format!("\n{}:\n{}\n", title, bullet_list(items)));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Text
    }
}

/// One `•` line per item, or `N/A` when there are none
pub fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        EMPTY_SECTION.to_string()
    } else {
        items.iter().map(|item| format!("• {}", item)).collect::<Vec<_>>().join("\n")
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            80..=u8::MAX => "🟢",
            60..=79 => "🟡",
            50..=59 => "🟠",
            _ => "🔴",
        }
    }

    fn markdown_list(items: &[String]) -> String {
        if items.is_empty() {
            format!("_{}_\n", EMPTY_SECTION)
        } else {
            items.iter().map(|item| format!("- {}\n", item)).collect()
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        let summary = &report.summary;
        let mut output = String::new();

        output.push_str("# Resume Fit Analysis Report\n\n");

        if self.include_metadata {
            let resume_name = Path::new(&report.metadata.resume_file)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| report.metadata.resume_file.clone());
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                resume_name, report.metadata.job_source
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Fit Score:** {}% {} ({})\n\n",
            summary.fit_score,
            Self::markdown_score_badge(summary.fit_score),
            summary.verdict
        ));
        output.push_str(&format!("{}\n\n", summary.fit_message));

        output.push_str("| Component | Value | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!(
            "| Text similarity | {:.1}% | {:.0}% |\n",
            summary.base_similarity,
            summary.component_weights.similarity_weight * 100.0
        ));
        output.push_str(&format!(
            "| Skill match | {}/{} ({:.0}%) | {:.0}% |\n\n",
            summary.skill_match.matched,
            summary.skill_match.required,
            summary.skill_match.percentage(),
            summary.component_weights.skill_weight * 100.0
        ));

        let sections: [(&str, &[String]); 6] = [
            ("Matched Skills", &report.matched_skills),
            ("Missing Skills", &report.missing_skills),
            ("Prioritized Missing Skills", &report.ranked_missing_skills),
            ("Areas to Highlight", &report.highlight_areas),
            ("Project Suggestions", &report.project_suggestions),
            ("General Insights", &report.general_insights),
        ];
        for (title, items) in sections {
            output.push_str(&format!("## {}\n\n{}\n", title, Self::markdown_list(items)));
        }

        if !report.top_keywords.is_empty() {
            output.push_str("## Shared Keywords\n\n");
            let words: Vec<String> = report.top_keywords.iter().map(|k| format!("`{}`", k.word)).collect();
            output.push_str(&format!("{}\n\n", words.join(", ")));
        }

        if !report.job_links.is_empty() {
            output.push_str("## Related Job Searches\n\n");
            output.push_str(&Self::markdown_list(&report.job_links));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &FitReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            text_formatter: TextFormatter,
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn generate_report(&self, report: &FitReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Text => self.text_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    match format {
        OutputFormat::Console | OutputFormat::Text => format!("{}_fit_report.txt", base_name),
        OutputFormat::Json => format!("{}_fit_report.json", base_name),
        OutputFormat::Markdown => format!("{}_fit_report.md", base_name),
    }
}
