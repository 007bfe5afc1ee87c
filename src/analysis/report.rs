//! Report generation for topology analysis.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::validation::ValidationIssue;

use super::types::{AnalysisReport, Suggestion};

/// Everything a report needs, bundled for serialization
#[derive(Debug, Clone, Serialize)]
pub struct TopologyReport {
    pub generated_at: DateTime<Utc>,
    pub config_dir: String,
    pub analysis: AnalysisReport,
    pub issues: Vec<ValidationIssue>,
    pub suggestions: Vec<Suggestion>,
}

impl TopologyReport {
    pub fn new(
        config_dir: &str,
        analysis: AnalysisReport,
        issues: Vec<ValidationIssue>,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            config_dir: config_dir.to_string(),
            analysis,
            issues,
            suggestions,
        }
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &TopologyReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Render the human-readable report text
pub fn render_text_report(report: &TopologyReport) -> String {
    let mut lines: Vec<String> = Vec::new();

    // Header
    lines.push("=".repeat(80));
    lines.push("                        NETSIM TOPOLOGY ANALYSIS".to_string());
    lines.push("=".repeat(80));
    lines.push(String::new());

    lines.push(format!("Analysis Date: {}", report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")));
    lines.push(format!("Config Directory: {}", report.config_dir));
    lines.push(report.analysis.summary.clone());
    lines.push(String::new());

    lines.push("Link Utilization:".to_string());
    if report.analysis.bandwidth.links.is_empty() {
        lines.push("  (no links)".to_string());
    }
    for link in &report.analysis.bandwidth.links {
        let marker = if report.analysis.bottlenecks.contains(&link.link) { "  <-- bottleneck" } else { "" };
        lines.push(format!(
            "  {:<24} {:>8.1} / {:>8.1} Mbps  ({:.2}){}",
            link.link, link.load_mbps, link.capacity_mbps, link.utilization, marker
        ));
    }
    lines.push(format!("  {}", report.analysis.bandwidth.summary));
    lines.push(String::new());

    lines.push(format!("Validation Issues ({}):", report.issues.len()));
    for issue in &report.issues {
        lines.push(format!("  - {}", issue));
    }
    lines.push(String::new());

    if !report.suggestions.is_empty() {
        lines.push("Recommendations:".to_string());
        for suggestion in &report.suggestions {
            lines.push(format!("  - {}", suggestion));
        }
        lines.push(String::new());
    }

    lines.push("=".repeat(80));
    lines.join("\n")
}

/// Generate human-readable text report
pub fn generate_text_report(report: &TopologyReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, render_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}
