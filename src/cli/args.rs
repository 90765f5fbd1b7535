//! CLI argument definitions for `seoanalyzer`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use logger::Level;
use seo_analyzer::config::ConfigOverrides;
use seo_analyzer::core::export::ExportFormat;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// Export format argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Comma-separated tables
    Csv,
    /// Paginated PDF
    Pdf,
    /// Markdown document
    #[value(alias = "md")]
    Markdown,
    /// Standalone HTML page
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Pdf => Self::Pdf,
            FormatArg::Markdown => Self::Markdown,
            FormatArg::Html => Self::Html,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    Get {
        /// Optional configuration key to display (e.g., `level`, `base_url`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Reset one configuration value to its default.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum BillingSubcommand {
    /// Start a checkout session for the Pro plan and print its address.
    Upgrade,
    /// Open the billing portal and print its address.
    Portal,
    /// Show the confirmation for a checkout return address or query.
    Confirm {
        /// Query string the billing page was opened with (e.g. `?success=true`)
        #[arg(value_name = "QUERY")]
        query: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Analyze a URL and show the report.
    ///
    /// A bare host such as `example.com` is analyzed over https.
    Analyze {
        /// Address to analyze
        #[arg(value_name = "URL")]
        url: String,

        /// Also export the report in this format
        #[arg(short, long, value_enum, value_name = "FORMAT")]
        export: Option<FormatArg>,

        /// Export destination (defaults to the configured exports directory)
        #[arg(short, long, value_name = "FILE", requires = "export")]
        output: Option<PathBuf>,
    },
    /// Show analysis history, average score and remaining quota.
    History,
    /// Show or export a stored report.
    Report {
        /// Report id, as listed by `history`
        #[arg(value_name = "ID")]
        id: String,

        /// Export the report in this format instead of printing it
        #[arg(short, long, value_enum, value_name = "FORMAT")]
        format: Option<FormatArg>,

        /// Export destination (defaults to the configured exports directory)
        #[arg(short, long, value_name = "FILE", requires = "format")]
        output: Option<PathBuf>,
    },
    /// Show the current plan and usage.
    Subscription,
    /// Manage billing.
    Billing {
        #[command(subcommand)]
        subcommand: BillingSubcommand,
    },
    /// Show who the client acts as.
    Whoami {
        /// Sign out of the current session
        #[arg(long)]
        sign_out: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "seoanalyzer",
    about = "SEO Score Analyzer command-line client",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level for this run
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path for this run
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override the API root
    #[arg(long = "config-api-url", value_name = "URL")]
    pub config_api_url: Option<String>,

    /// Override the API root (short form)
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the identity provider key; an empty value forces demo mode
    #[arg(long = "provider-key", value_name = "KEY")]
    pub provider_key: Option<String>,

    /// Override the exports directory
    #[arg(long = "config-exports-dir", value_name = "DIR")]
    pub config_exports_dir: Option<PathBuf>,

    /// Override the exports directory (short form)
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g. `--api-url`) take precedence over long-form
    /// flags (e.g. `--config-api-url`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path),
            verbose: self.config_verbose,
            api_url: self
                .api_url
                .clone()
                .or_else(|| self.config_api_url.clone()),
            provider_key: self.provider_key.clone(),
            exports_dir: self
                .exports_dir
                .as_ref()
                .or(self.config_exports_dir.as_ref())
                .map(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare(command: Command) -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            config_api_url: None,
            api_url: None,
            provider_key: None,
            config_exports_dir: None,
            exports_dir: None,
            command,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_format_arg_maps_to_export_format() {
        assert_eq!(ExportFormat::from(FormatArg::Csv), ExportFormat::Csv);
        assert_eq!(ExportFormat::from(FormatArg::Markdown), ExportFormat::Markdown);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare(Command::History).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.api_url.is_none());
        assert!(overrides.provider_key.is_none());
        assert!(overrides.exports_dir.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let mut cli = bare(Command::History);
        cli.config_level = Some(LogLevelArg::Debug);
        cli.config_log_file = Some(PathBuf::from("/tmp/test.log"));
        cli.config_verbose = Some(true);
        cli.api_url = Some("http://api.test".to_string());
        cli.provider_key = Some(String::new());
        cli.exports_dir = Some(PathBuf::from("/exports"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.api_url, Some("http://api.test".to_string()));
        assert_eq!(overrides.provider_key, Some(String::new()));
        assert_eq!(overrides.exports_dir, Some("/exports".to_string()));
    }

    #[test]
    fn test_short_form_precedence_over_long_form() {
        let mut cli = bare(Command::History);
        cli.config_api_url = Some("http://long".to_string());
        cli.api_url = Some("http://short".to_string());
        cli.config_exports_dir = Some(PathBuf::from("/long"));
        cli.exports_dir = Some(PathBuf::from("/short"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.api_url, Some("http://short".to_string()));
        assert_eq!(overrides.exports_dir, Some("/short".to_string()));
    }

    #[test]
    fn test_long_form_when_short_form_absent() {
        let mut cli = bare(Command::History);
        cli.config_api_url = Some("http://long".to_string());
        cli.config_exports_dir = Some(PathBuf::from("/long"));

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.api_url, Some("http://long".to_string()));
        assert_eq!(overrides.exports_dir, Some("/long".to_string()));
    }

    #[test]
    fn test_parses_analyze_with_export() {
        let cli = Cli::try_parse_from([
            "seoanalyzer",
            "--api-url",
            "http://localhost:9000",
            "analyze",
            "example.com",
            "--export",
            "md",
        ])
        .unwrap();
        match cli.command {
            Command::Analyze { url, export, output } => {
                assert_eq!(url, "example.com");
                assert_eq!(export, Some(FormatArg::Markdown));
                assert!(output.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_output_requires_format() {
        assert!(Cli::try_parse_from(["seoanalyzer", "report", "abc", "-o", "x.pdf"]).is_err());
    }
}
