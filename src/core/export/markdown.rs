//! Markdown exporter
//!
//! Produces a report with one table per section, readable as plain text and
//! rendered nicely by GitHub, GitLab and most editors.

use super::{fill_template, ExportError, ExportFormat, ReportExporter};
use crate::core::models::Report;
use crate::core::views::{IssueCounts, ReportSummary};
use std::fmt::Write;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("templates/report.md");

/// Markdown exporter
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownExporter;

impl MarkdownExporter {
    /// Create a new Markdown exporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report as Markdown text
    #[must_use]
    pub fn to_markdown(report: &Report) -> String {
        let summary = ReportSummary::of(report);
        let IssueCounts {
            errors,
            warnings,
            info,
        } = summary.issues;

        fill_template(
            MARKDOWN_TEMPLATE,
            &[
                ("url", cell(&report.url)),
                ("score", report.score.to_string()),
                ("score_label", summary.band.label().to_string()),
                ("analyzed_at", summary.analyzed_at.clone()),
                ("error_count", errors.to_string()),
                ("warning_count", warnings.to_string()),
                ("info_count", info.to_string()),
                ("issues", Self::issues_table(report)),
                ("recommendations", Self::recommendations_table(report)),
                ("performance", Self::performance_table(report)),
                ("version", crate::core::get_version().to_string()),
            ],
        )
    }

    fn issues_table(report: &Report) -> String {
        if report.issues.is_empty() {
            return "_No issues found_".to_string();
        }
        let mut table = String::from("| Type | Issue | Details |\n|---|---|---|\n");
        for issue in &report.issues {
            let _ = writeln!(
                table,
                "| {} | {} | {} |",
                issue.kind,
                cell(&issue.title),
                cell(&issue.description)
            );
        }
        table
    }

    fn recommendations_table(report: &Report) -> String {
        if report.recommendations.is_empty() {
            return "_No recommendations_".to_string();
        }
        let mut table = String::from("| Priority | Recommendation | Details |\n|---|---|---|\n");
        for rec in &report.recommendations {
            let _ = writeln!(
                table,
                "| {} | {} | {} |",
                rec.priority,
                cell(&rec.title),
                cell(&rec.description)
            );
        }
        table
    }

    fn performance_table(report: &Report) -> String {
        if report.performance.is_empty() {
            return "_No performance data_".to_string();
        }
        let mut table = String::from("| Metric | Value | Status |\n|---|---|---|\n");
        for metric in &report.performance {
            let _ = writeln!(
                table,
                "| {} | {} | {} |",
                cell(&metric.metric),
                cell(&metric.value),
                metric.status
            );
        }
        table
    }
}

impl ReportExporter for MarkdownExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Markdown
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        Ok(Self::to_markdown(report).into_bytes())
    }
}

/// Make text safe inside a table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
