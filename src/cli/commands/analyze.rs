//! Analyze command: the dashboard's analyze form

use super::{export_loaded, print_report, Context, UPGRADE_HINT};
use seo_analyzer::core::export::ExportFormat;
use seo_analyzer::core::pages::{DashboardController, ResultsController, SubmitOutcome};
use std::path::Path;
use std::sync::Arc;

/// Analyze `url`, print the report and optionally export it
///
/// # Errors
/// The inline error the dashboard would show, or an export failure
pub async fn run(
    ctx: &Context,
    url: &str,
    export: Option<ExportFormat>,
    output: Option<&Path>,
) -> Result<(), String> {
    let user = ctx.user()?;
    let mut dashboard = DashboardController::new(Arc::clone(&ctx.backend), user.clone());

    println!("Analyzing {}...", url.trim());
    let report = match dashboard.submit(url).await {
        SubmitOutcome::ShowReport(report) => report,
        SubmitOutcome::Inline(inline) if inline.offers_upgrade => {
            return Err(format!("{}\n  {UPGRADE_HINT}", inline.message));
        }
        SubmitOutcome::Inline(inline) => return Err(inline.message),
    };

    print_report(&report);

    if let Some(format) = export {
        let results = ResultsController::with_report(Arc::clone(&ctx.backend), user.id, report);
        export_loaded(&ctx.config, &results, format, output).await?;
    }
    Ok(())
}
