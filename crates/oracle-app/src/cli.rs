//! CLI argument definitions for the oracle chat client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Oracle: ask natural-language questions about cards and stream the answer.
#[derive(Parser, Debug)]
#[command(name = "oracle", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the search backend.
    #[arg(short = 'b', long = "base-url")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Ask a single question and exit instead of reading from stdin.
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > ORACLE_CONFIG env var > ~/.oracle/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("ORACLE_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend base URL.
    ///
    /// Priority: --base-url flag > ORACLE_API_BASE env var.
    /// Returns `None` if neither is set (use config value).
    pub fn resolve_base_url(&self) -> Option<String> {
        if let Some(ref url) = self.base_url {
            return Some(url.clone());
        }
        std::env::var("ORACLE_API_BASE")
            .ok()
            .filter(|url| !url.trim().is_empty())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// The one-shot query, if any words were given.
    pub fn one_shot_query(&self) -> Option<String> {
        let query = self.query.join(" ");
        if query.trim().is_empty() {
            None
        } else {
            Some(query)
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".oracle").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".oracle").join("config.toml");
    }
    PathBuf::from("config.toml")
}
