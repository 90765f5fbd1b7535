//! CLI command handlers for `seoanalyzer`.
//!
//! Each command is the terminal counterpart of one page of the web app and
//! lives in its own submodule. Handlers return `Err(message)` for failures
//! the user should see; `main` prints them with a `✗` prefix.

pub mod analyze;
pub mod billing;
pub mod config;
pub mod history;
pub mod report;
pub mod subscription;
pub mod whoami;

use seo_analyzer::config::Config;
use seo_analyzer::core::api::ReportBackend;
use seo_analyzer::core::export::ExportFormat;
use seo_analyzer::core::models::Report;
use seo_analyzer::core::pages::ResultsController;
use seo_analyzer::core::session::{Access, Session, User};
use seo_analyzer::core::views::{group_performance, ReportSummary};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Pointer to the upgrade flow shown next to quota errors
pub const UPGRADE_HINT: &str = "Upgrade to Pro: run `seoanalyzer billing upgrade`";

/// Everything a command needs, resolved once at startup
pub struct Context {
    /// Effective configuration (file + CLI overrides)
    pub config: Config,
    /// Backend client
    pub backend: Arc<dyn ReportBackend>,
    /// Session resolved from `config`
    pub session: Session,
}

impl Context {
    /// The user commands act for
    ///
    /// # Errors
    /// When the provider session has no signed-in user
    pub fn user(&self) -> Result<User, String> {
        match self.session.access() {
            Access::Allow(user) => Ok(user.clone()),
            Access::Wait => Err("Session is still loading".to_string()),
            Access::Redirect(route) => Err(format!(
                "Not signed in (redirect to {route}). Set `auth.user_id` with `seoanalyzer config set user_id <ID>`"
            )),
        }
    }
}

/// Print a report the way the results page lays it out
pub fn print_report(report: &Report) {
    let summary = ReportSummary::of(report);

    println!("\n=== SEO Report ===\n");
    println!("  URL:      {}", summary.url);
    println!(
        "  Score:    {}/100 ({})",
        summary.score,
        summary.headline()
    );
    if !report.created_at.is_empty() {
        println!("  Analyzed: {}", summary.analyzed_at);
    }
    if let Some(id) = &report.id {
        println!("  ID:       {id}");
    }
    println!(
        "  {} Errors, {} Warnings, {} Info",
        summary.issues.errors, summary.issues.warnings, summary.issues.info
    );

    println!("\nIssues Found ({})", report.issues.len());
    if report.issues.is_empty() {
        println!("  No issues found");
    }
    for issue in &report.issues {
        println!("  [{}] {}", issue.kind.as_str().to_uppercase(), issue.title);
        if !issue.description.is_empty() {
            println!("      {}", issue.description);
        }
    }

    println!("\nRecommendations ({})", report.recommendations.len());
    if report.recommendations.is_empty() {
        println!("  No recommendations");
    }
    for rec in &report.recommendations {
        println!("  [{}] {}", rec.priority.as_str().to_uppercase(), rec.title);
        if !rec.description.is_empty() {
            println!("      {}", rec.description);
        }
    }

    println!("\nPerformance Metrics");
    for line in performance_lines(report) {
        println!("{line}");
    }
    println!();
}

/// Performance rows in report order, followed by a per-status tally
fn performance_lines(report: &Report) -> Vec<String> {
    if report.performance.is_empty() {
        return vec!["  No performance data".to_string()];
    }
    let mut lines: Vec<String> = report
        .performance
        .iter()
        .map(|m| format!("  {:<28} {:<16} {}", m.metric, m.value, m.status))
        .collect();
    let tally: Vec<String> = group_performance(report)
        .iter()
        .map(|(status, metrics)| format!("{} {status}", metrics.len()))
        .collect();
    lines.push(format!("  ({})", tally.join(", ")));
    lines
}

/// Export the report held by `results` and print the outcome
///
/// Without `output` the file lands in the configured exports directory
/// under its default name.
///
/// # Errors
/// When rendering or writing fails
pub async fn export_loaded(
    config: &Config,
    results: &ResultsController,
    format: ExportFormat,
    output: Option<&Path>,
) -> Result<(), String> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => results
            .default_export_path(format, &PathBuf::from(&config.paths.exports_dir))
            .ok_or_else(|| "No report loaded".to_string())?,
    };
    let written = results
        .export(format, &path)
        .await
        .map_err(|e| format!("Failed to export {format}: {e}"))?;
    println!("✓ Exported {format}: {}", written.display());
    Ok(())
}
