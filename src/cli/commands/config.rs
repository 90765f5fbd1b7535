//! Config command handler
//!
//! Operates on the stored configuration; per-run flag overrides are never
//! written back to disk.

use crate::args::ConfigSubcommand;
use seo_analyzer::config::Config;
use std::io::{self, Write};

/// Dispatch config subcommands
///
/// # Errors
/// When a key is unknown, a value is invalid or the file cannot be written
pub fn run(
    subcommand: Option<ConfigSubcommand>,
    stored: &mut Config,
    defaults: &Config,
) -> Result<(), String> {
    match subcommand {
        None => {
            show(stored, None);
            Ok(())
        }
        Some(ConfigSubcommand::Get { key }) => {
            show(stored, key.as_deref());
            Ok(())
        }
        Some(ConfigSubcommand::Set { key, value }) => set(stored, &key, &value),
        Some(ConfigSubcommand::Unset { key }) => unset(stored, defaults, &key),
        Some(ConfigSubcommand::Reset) => reset(),
    }
}

fn show(config: &Config, key: Option<&str>) {
    match key {
        Some(k) => match config.get(k) {
            Some(value) => println!("{value}"),
            None => eprintln!("Unknown config key: '{k}'"),
        },
        None => {
            println!("\n=== Configuration ===\n");
            println!("  file: {}\n", Config::config_file_path().display());
            print!("{config}");
        }
    }
}

fn set(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))?;

    // Secrets are not echoed back.
    let shown = if key.replace('-', "_") == "provider_key" && !value.is_empty() {
        "<set>"
    } else {
        value
    };
    println!("✓ Set {key} = {shown}");
    Ok(())
}

fn unset(config: &mut Config, defaults: &Config, key: &str) -> Result<(), String> {
    config.unset(key, defaults)?;
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))?;
    println!("✓ Reset {key} to default");
    Ok(())
}

fn reset() -> Result<(), String> {
    if !Config::config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return Ok(());
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let answer = response.trim();
    if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
        Config::reset().map_err(|e| format!("Failed to remove config file: {e}"))?;
        println!("✓ Config reset to defaults");
    } else {
        println!("✗ Reset cancelled");
    }
    Ok(())
}
