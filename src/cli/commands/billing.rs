//! Billing command: upgrade, portal and checkout confirmation

use super::Context;
use crate::args::BillingSubcommand;
use seo_analyzer::core::pages::{BillingController, BillingOutcome};
use std::sync::Arc;

/// Dispatch billing subcommands
///
/// # Errors
/// The alert the billing page would show
pub async fn run(ctx: &Context, subcommand: BillingSubcommand) -> Result<(), String> {
    let user = ctx.user()?;
    let mut billing =
        BillingController::new(Arc::clone(&ctx.backend), user, &ctx.config.billing.app_origin);

    match subcommand {
        BillingSubcommand::Upgrade => {
            let subscription = billing.load().await;
            if subscription.is_pro() {
                println!("✓ Already on the Pro plan");
                return Ok(());
            }
            let outcome = billing.start_checkout().await;
            finish(outcome, "Complete your upgrade at")
        }
        BillingSubcommand::Portal => {
            let outcome = billing.open_portal().await;
            finish(outcome, "Manage billing at")
        }
        BillingSubcommand::Confirm { query } => {
            let query = query.split_once('?').map_or(query.as_str(), |(_, q)| q);
            billing.note_return(query);
            match billing.take_banner() {
                Some(banner) => {
                    println!("✓ {}", banner.title);
                    println!("  {}", banner.message);
                }
                None => println!("No completed payment in this return address"),
            }
            Ok(())
        }
    }
}

fn finish(outcome: BillingOutcome, lead: &str) -> Result<(), String> {
    match outcome {
        BillingOutcome::Redirect(url) => {
            println!("✓ {lead}:\n  {url}");
            Ok(())
        }
        BillingOutcome::Alert(message) => Err(message),
    }
}
