//! Report command: the results page

use super::{export_loaded, print_report, Context};
use seo_analyzer::core::export::ExportFormat;
use seo_analyzer::core::pages::{ResultsController, ResultsState, Route};
use std::path::Path;
use std::sync::Arc;

/// Show report `id`, or export it when a format is given
///
/// # Errors
/// When the report cannot be found or the export fails
pub async fn run(
    ctx: &Context,
    id: &str,
    format: Option<ExportFormat>,
    output: Option<&Path>,
) -> Result<(), String> {
    let user = ctx.user()?;
    let mut results = ResultsController::new(Arc::clone(&ctx.backend), user.id);

    match results.load(id).await {
        ResultsState::Loaded(report) => {
            if format.is_none() {
                print_report(report);
            }
        }
        ResultsState::NoReport { message, back } => {
            return Err(format!("{message}\n  {}", back_hint(*back)));
        }
        ResultsState::Loading => return Err("Report is still loading".to_string()),
    }

    if let Some(format) = format {
        export_loaded(&ctx.config, &results, format, output).await?;
    }
    Ok(())
}

fn back_hint(route: Route) -> String {
    match route {
        Route::Dashboard => "Go to Dashboard: run `seoanalyzer history`".to_string(),
        other => format!("Go back to {other}"),
    }
}
