//! Subscription command: the billing page's plan card

use super::{Context, UPGRADE_HINT};
use seo_analyzer::core::pages::BillingController;
use seo_analyzer::core::views::remaining_quota;
use std::sync::Arc;

/// Print the current plan and usage
///
/// # Errors
/// When no user is signed in
pub async fn run(ctx: &Context) -> Result<(), String> {
    let user = ctx.user()?;
    let mut billing =
        BillingController::new(Arc::clone(&ctx.backend), user, &ctx.config.billing.app_origin);
    let subscription = billing.load().await.clone();

    println!("\n=== Subscription ===\n");
    println!("  Plan:      {}", subscription.plan);
    match subscription.usage_line() {
        Some(usage) => {
            println!("  Usage:     {usage}");
            println!("  Remaining: {}", remaining_quota(&subscription));
            println!("\n  {UPGRADE_HINT}");
        }
        None => {
            println!("  Usage:     unlimited");
            println!("\n  Manage billing: run `seoanalyzer billing portal`");
        }
    }
    Ok(())
}
