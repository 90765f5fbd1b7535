//! Configuration for the `seoanalyzer` client
//!
//! Settings live in a TOML file under the platform config directory and are
//! seeded from compiled-in defaults on first run. Command-line flags can
//! override any of them for a single invocation through [`ConfigOverrides`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to [`Config::config_dir`] in path-like values
pub const DIR_VARIABLE: &str = "$SEO_ANALYZER";

/// Keys accepted by [`Config::get`], [`Config::set`] and [`Config::unset`]
pub const KEYS: [&str; 12] = [
    "level",
    "file",
    "verbose",
    "base_url",
    "timeout_secs",
    "provider_key",
    "user_id",
    "email",
    "display_name",
    "app_origin",
    "exports_dir",
    "session_mode",
];

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path; empty disables the file sink
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Backend API configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, e.g. `http://localhost:8000`
    #[serde(default)]
    pub base_url: String,
    /// Per-request timeout in seconds; 0 uses the client default
    #[serde(default)]
    pub timeout_secs: u64,
}

/// Identity provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Provider publishable key; non-empty selects provider mode
    #[serde(default)]
    pub provider_key: String,
    /// Signed-in account id reported by the provider
    #[serde(default)]
    pub user_id: String,
    /// Primary email of the signed-in account
    #[serde(default)]
    pub email: String,
    /// Display name of the signed-in account
    #[serde(default)]
    pub display_name: String,
}

/// Billing configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillingConfig {
    /// Origin of the web app; checkout and portal pages return here
    #[serde(default)]
    pub app_origin: String,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for exported reports
    #[serde(default)]
    pub exports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Backend settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Identity settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Billing settings
    #[serde(default)]
    pub billing: BillingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Which identity source the process runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// An identity provider key is configured
    Provider,
    /// No provider; everything runs as the fixed demo account
    Demo,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider => f.write_str("provider"),
            Self::Demo => f.write_str("demo"),
        }
    }
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override API root
    pub api_url: Option<String>,
    /// Override identity provider key
    pub provider_key: Option<String>,
    /// Override exports directory
    pub exports_dir: Option<String>,
}

/// Copy `default` into `field` when `field` is empty and `default` is not
fn fill_empty(field: &mut String, default: &str) -> bool {
    if field.is_empty() && !default.is_empty() {
        default.clone_into(field);
        true
    } else {
        false
    }
}

impl Config {
    /// Get the `$SEO_ANALYZER` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/seoanalyzer`
    /// - macOS: `~/Library/Application Support/seoanalyzer`
    /// - Windows: `%APPDATA%\seoanalyzer`
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("seoanalyzer")
    }

    /// Full path of the user config file
    ///
    /// `dconfig.toml` for debug builds so a development binary never touches
    /// the release configuration.
    #[must_use]
    pub fn config_file_path() -> PathBuf {
        Self::config_dir().join(CONFIG_FILE_NAME)
    }

    /// Identity source selected by this configuration.
    ///
    /// This is the only place the provider-vs-demo decision is made.
    #[must_use]
    pub fn session_mode(&self) -> SessionMode {
        if self.auth.provider_key.trim().is_empty() {
            SessionMode::Demo
        } else {
            SessionMode::Provider
        }
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only fields that are empty here and non-empty in `defaults` change.
    /// Auth identity fields are never merged, so an empty provider key keeps
    /// meaning demo mode.
    ///
    /// # Returns
    ///
    /// `true` if any field was filled in
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        changed |= fill_empty(&mut self.logging.level, &defaults.logging.level);
        changed |= fill_empty(&mut self.logging.file, &defaults.logging.file);
        changed |= fill_empty(&mut self.api.base_url, &defaults.api.base_url);
        if self.api.timeout_secs == 0 && defaults.api.timeout_secs != 0 {
            self.api.timeout_secs = defaults.api.timeout_secs;
            changed = true;
        }
        changed |= fill_empty(&mut self.billing.app_origin, &defaults.billing.app_origin);
        changed |= fill_empty(&mut self.paths.exports_dir, &defaults.paths.exports_dir);

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides affect this run only; nothing is written back to disk.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file = Self::expand_variables(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }
        if let Some(api_url) = &overrides.api_url {
            self.api.base_url.clone_from(api_url);
        }
        if let Some(key) = &overrides.provider_key {
            self.auth.provider_key.clone_from(key);
        }
        if let Some(dir) = &overrides.exports_dir {
            self.paths.exports_dir = Self::expand_variables(dir);
        }
    }

    /// Expand `$SEO_ANALYZER` to the config directory
    ///
    /// ```ignore
    /// let expanded = Config::expand_variables("$SEO_ANALYZER/exports");
    /// // "/home/user/.config/seoanalyzer/exports"
    /// ```
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::config_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing sections and fields take their serde defaults. Path-like values
    /// have `$SEO_ANALYZER` expanded.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);

        Ok(config)
    }

    /// Load configuration from the compiled-in defaults
    ///
    /// Debug builds embed `DefaultCLIConfigDebug.toml`, release builds
    /// `DefaultCLIConfigRelease.toml`.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).unwrap_or_else(|e| {
            logger::error!("Compiled-in default configuration is invalid: {e}");
            Self::default()
        })
    }

    /// Load configuration from the user config file, creating it on first run
    ///
    /// An existing file has missing fields merged from defaults and is
    /// rewritten when that changes anything. An unreadable or malformed file
    /// falls back to defaults without being overwritten.
    #[must_use]
    pub fn load() -> Self {
        Self::load_from(&Self::config_file_path())
    }

    /// Same as [`load`](Self::load) for an explicit file path
    #[must_use]
    pub fn load_from(config_file: &Path) -> Self {
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            if let Err(e) = defaults.save_to(config_file) {
                logger::warn!(
                    "Could not create config file {}: {e}",
                    config_file.display()
                );
            }
            return defaults;
        }

        let content = match fs::read_to_string(config_file) {
            Ok(content) => content,
            Err(e) => {
                logger::warn!("Could not read {}: {e}", config_file.display());
                return defaults;
            }
        };

        match Self::from_toml(&content) {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    if let Err(e) = config.save_to(config_file) {
                        logger::warn!("Could not update {}: {e}", config_file.display());
                    }
                }
                config
            }
            Err(e) => {
                logger::warn!(
                    "Ignoring malformed config {}: {e}",
                    config_file.display()
                );
                defaults
            }
        }
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to(&Self::config_file_path())
    }

    /// Save configuration to an explicit file path, creating parent directories
    ///
    /// # Errors
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save_to(&self, config_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Accepts the names in [`KEYS`]; dashes may stand in for underscores.
    /// `session_mode` is derived and read-only.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "base_url" | "api_url" => self.api.base_url.clone(),
            "timeout_secs" => self.api.timeout_secs.to_string(),
            "provider_key" => self.auth.provider_key.clone(),
            "user_id" => self.auth.user_id.clone(),
            "email" => self.auth.email.clone(),
            "display_name" => self.auth.display_name.clone(),
            "app_origin" => self.billing.app_origin.clone(),
            "exports_dir" => self.paths.exports_dir.clone(),
            "session_mode" => self.session_mode().to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key
    ///
    /// Only updates the in-memory config; call [`save`](Self::save) to persist.
    ///
    /// # Errors
    /// Returns an error for an unknown or read-only key, or a value that does
    /// not parse (`verbose` must be a boolean, `timeout_secs` an integer)
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => {
                value
                    .parse::<logger::Level>()
                    .map_err(|e| format!("Invalid value for 'level': {e}"))?;
                self.logging.level = value.trim().to_lowercase();
            }
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "base_url" | "api_url" => self.api.base_url = value.to_string(),
            "timeout_secs" => {
                self.api.timeout_secs = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid integer value for 'timeout_secs': '{value}'"))?;
            }
            "provider_key" => self.auth.provider_key = value.to_string(),
            "user_id" => self.auth.user_id = value.to_string(),
            "email" => self.auth.email = value.to_string(),
            "display_name" => self.auth.display_name = value.to_string(),
            "app_origin" => self.billing.app_origin = value.trim_end_matches('/').to_string(),
            "exports_dir" => self.paths.exports_dir = Self::expand_variables(value),
            "session_mode" => {
                return Err(
                    "'session_mode' is derived from 'provider_key'; set that instead".to_string(),
                )
            }
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset a single configuration value to its default
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or is read-only
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "base_url" | "api_url" => self.api.base_url.clone_from(&defaults.api.base_url),
            "timeout_secs" => self.api.timeout_secs = defaults.api.timeout_secs,
            "provider_key" => self.auth.provider_key.clone_from(&defaults.auth.provider_key),
            "user_id" => self.auth.user_id.clone_from(&defaults.auth.user_id),
            "email" => self.auth.email.clone_from(&defaults.auth.email),
            "display_name" => self.auth.display_name.clone_from(&defaults.auth.display_name),
            "app_origin" => self
                .billing
                .app_origin
                .clone_from(&defaults.billing.app_origin),
            "exports_dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "session_mode" => return Err("'session_mode' is read-only".to_string()),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Delete the user config file so the next [`load`](Self::load) recreates it
    ///
    /// Succeeds when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[api]")?;
        writeln!(f, "  base_url = \"{}\"", self.api.base_url)?;
        writeln!(f, "  timeout_secs = {}", self.api.timeout_secs)?;

        writeln!(f, "\n[auth]  # session mode: {}", self.session_mode())?;
        let key = if self.auth.provider_key.is_empty() {
            ""
        } else {
            "<set>"
        };
        writeln!(f, "  provider_key = \"{key}\"")?;
        writeln!(f, "  user_id = \"{}\"", self.auth.user_id)?;
        writeln!(f, "  email = \"{}\"", self.auth.email)?;
        writeln!(f, "  display_name = \"{}\"", self.auth.display_name)?;

        writeln!(f, "\n[billing]")?;
        writeln!(f, "  app_origin = \"{}\"", self.billing.app_origin)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_defaults_parse() {
        let parsed = Config::from_toml(CONFIG_DEFAULTS);
        assert!(parsed.is_ok(), "{parsed:?}");
        let config = parsed.unwrap();
        assert!(!config.api.base_url.is_empty());
        assert!(config.api.timeout_secs > 0);
        assert!(!config.billing.app_origin.is_empty());
    }

    #[test]
    fn defaults_run_in_demo_mode() {
        assert_eq!(Config::from_defaults().session_mode(), SessionMode::Demo);
    }

    #[test]
    fn provider_key_selects_provider_mode() {
        let mut config = Config::from_defaults();
        config.set("provider-key", "pk_test_123").unwrap();
        assert_eq!(config.session_mode(), SessionMode::Provider);
        assert_eq!(config.get("session_mode").unwrap(), "provider");

        config.set("provider_key", "   ").unwrap();
        assert_eq!(config.session_mode(), SessionMode::Demo);
    }

    #[test]
    fn session_mode_is_read_only() {
        let mut config = Config::default();
        assert!(config.set("session_mode", "provider").is_err());
        assert!(config.unset("session_mode", &Config::default()).is_err());
    }

    #[test]
    fn level_is_validated() {
        let mut config = Config::default();
        assert!(config.set("level", "loud").is_err());
        config.set("level", " INFO ").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn every_key_is_readable() {
        let config = Config::from_defaults();
        for key in KEYS {
            assert!(config.get(key).is_some(), "key {key}");
        }
    }

    #[test]
    fn merge_leaves_identity_alone() {
        let mut defaults = Config::default();
        defaults.auth.provider_key = "pk".into();
        defaults.api.base_url = "http://api".into();

        let mut config = Config::default();
        assert!(config.merge_defaults(&defaults));
        assert_eq!(config.api.base_url, "http://api");
        assert!(config.auth.provider_key.is_empty());
        assert!(!config.merge_defaults(&defaults));
    }

    #[test]
    fn display_hides_provider_key() {
        let mut config = Config::default();
        config.auth.provider_key = "pk_live_secret".into();
        let shown = config.to_string();
        assert!(!shown.contains("pk_live_secret"));
        assert!(shown.contains("<set>"));
    }
}
