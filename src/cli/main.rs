//! Command-line interface entry point for `seoanalyzer`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use commands::Context;
use logger::{enable_debug, enable_verbose, info, init_file_logging, set_level, Level};
use seo_analyzer::config::Config;
use seo_analyzer::core::api::{HttpBackend, ReportBackend};
use seo_analyzer::core::session::Session;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // `stored` is what config commands edit; overrides only apply to this run
    let mut stored = Config::load();
    let defaults = Config::from_defaults();
    let mut config = stored.clone();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let effective_level = args
        .log_level
        .map(Into::into)
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    let mut level = effective_level;
    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path = (!config.logging.file.is_empty())
        .then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        match init_file_logging(log_path) {
            Ok(()) if verbose => eprintln!("✓ File logging initialized at: {display_path}"),
            Ok(()) => info!("File logging initialized at: {display_path}"),
            Err(e) => eprintln!("✗ Failed to initialize file logging at: {display_path}: {e}"),
        }
    }

    let backend: Arc<dyn ReportBackend> = Arc::new(HttpBackend::from_config(&config.api));
    let session = Session::from_config(&config);
    info!("Session mode: {}", session.mode());

    let mut ctx = Context {
        config,
        backend,
        session,
    };

    let result = match args.command {
        Command::Config { subcommand } => commands::config::run(subcommand, &mut stored, &defaults),
        Command::Analyze {
            url,
            export,
            output,
        } => commands::analyze::run(&ctx, &url, export.map(Into::into), output.as_deref()).await,
        Command::History => commands::history::run(&ctx).await,
        Command::Report { id, format, output } => {
            commands::report::run(&ctx, &id, format.map(Into::into), output.as_deref()).await
        }
        Command::Subscription => commands::subscription::run(&ctx).await,
        Command::Billing { subcommand } => commands::billing::run(&ctx, subcommand).await,
        Command::Whoami { sign_out } => commands::whoami::run(&mut ctx, &mut stored, sign_out),
    };

    if let Err(message) = result {
        eprintln!("✗ {message}");
        std::process::exit(1);
    }
}
