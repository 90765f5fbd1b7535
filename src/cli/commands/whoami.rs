//! Whoami command: session identity and sign-out

use super::Context;
use seo_analyzer::config::{Config, SessionMode};

/// Print who the client acts as, optionally signing out first
///
/// Signing out of a provider session clears the stored `[auth]` identity so
/// later runs start signed out. Demo sessions keep their identity.
///
/// # Errors
/// When the session cannot sign out or the stored config cannot be written
pub fn run(ctx: &mut Context, stored: &mut Config, sign_out: bool) -> Result<(), String> {
    println!("  Session mode: {}", ctx.session.mode());
    println!("  API:          {}", ctx.config.api.base_url);

    if sign_out {
        let route = ctx.session.sign_out().map_err(|e| e.to_string())?;
        if ctx.session.mode() == SessionMode::Provider {
            stored.auth.user_id.clear();
            stored.auth.email.clear();
            stored.auth.display_name.clear();
            stored
                .save()
                .map_err(|e| format!("Failed to save config: {e}"))?;
        }
        println!("✓ Signed out (navigating to {route})");
    }

    match ctx.session.user() {
        Some(user) => {
            println!("  User:         {} <{}>", user.display_name, user.email);
            println!("  ID:           {}", user.id);
        }
        None => println!("  Not signed in"),
    }
    Ok(())
}
