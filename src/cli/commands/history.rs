//! History command: dashboard stat cards and report list

use super::Context;
use seo_analyzer::core::pages::DashboardController;
use seo_analyzer::core::views::band;
use std::sync::Arc;

/// Print the stat cards and every stored report
///
/// # Errors
/// When no user is signed in
pub async fn run(ctx: &Context) -> Result<(), String> {
    let user = ctx.user()?;
    let mut dashboard = DashboardController::new(Arc::clone(&ctx.backend), user);
    dashboard.load().await;

    let stats = dashboard.stats();
    println!("\n=== Dashboard: {} ===\n", dashboard.user().display_name);
    println!("  Total analyses:     {}", stats.total_analyses);
    println!("  Average score:      {}", stats.average_score);
    println!("  Remaining analyses: {}", stats.remaining);
    if let Some(usage) = &stats.usage_line {
        println!("  Plan usage:         {usage}");
    }

    println!("\nRecent Analyses");
    if dashboard.history().is_empty() {
        println!("  No analyses yet. Run `seoanalyzer analyze <URL>` to get started.");
        return Ok(());
    }
    for report in dashboard.history() {
        let id = report.id.as_deref().unwrap_or("-");
        println!(
            "  {id:<26} {:>3}  {:<10} {}  {}",
            report.score,
            band(report.score).label(),
            report.created_at_display(),
            report.url
        );
    }
    if !stats.remaining.allows_analysis() {
        println!("\n  No analyses left this period. {}", super::UPGRADE_HINT);
    }
    Ok(())
}
