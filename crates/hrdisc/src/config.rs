//! Session configuration
//!
//! Values are merged from, lowest precedence first: built-in defaults, an
//! optional JSON file, then `HRDISC_*` environment variables. Command-line
//! flags are applied on top by the binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use hrdisc_core::{CleanOptions, FormatOptions};
use hrdisc_sheets::{LoadOptions, RowWriteOptions, FALLBACK_WORKSHEETS};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Path of the JSON config file
pub const ENV_CONFIG: &str = "HRDISC_CONFIG";
/// Spreadsheet document id
pub const ENV_SHEET_ID: &str = "HRDISC_SHEET_ID";
/// Preferred worksheet title
pub const ENV_WORKSHEET: &str = "HRDISC_WORKSHEET";
/// Service-account key path
pub const ENV_CREDENTIALS: &str = "HRDISC_CREDENTIALS";
/// Auto-refresh interval in seconds (0 disables)
pub const ENV_REFRESH_SECS: &str = "HRDISC_REFRESH_SECS";

/// Everything a [`crate::Session`] needs to know
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrmConfig {
    /// Spreadsheet document holding the clients
    pub spreadsheet_id: Option<String>,
    /// Worksheet read and written when present
    pub worksheet: String,
    /// Titles tried when `worksheet` is absent
    pub fallback_worksheets: Vec<String>,
    /// Service-account key document; remote features are off without it
    pub credentials_path: Option<PathBuf>,
    /// Auto-refresh interval in seconds
    pub refresh_secs: Option<u64>,
    /// Narrative values longer than this are truncated for display
    pub truncate_threshold: usize,
    /// Characters kept in a truncated summary
    pub summary_len: usize,
    /// Double quotes in narrative values on remote writes
    pub escape_narrative_quotes: bool,
    /// Per-request timeout for remote calls, in seconds
    pub http_timeout_secs: Option<u64>,
}

impl Default for CrmConfig {
    fn default() -> Self {
        let format = FormatOptions::default();
        Self {
            spreadsheet_id: None,
            worksheet: "Clients".to_string(),
            fallback_worksheets: FALLBACK_WORKSHEETS.iter().map(|s| s.to_string()).collect(),
            credentials_path: None,
            refresh_secs: None,
            truncate_threshold: format.truncate_threshold,
            summary_len: format.summary_len,
            escape_narrative_quotes: false,
            http_timeout_secs: Some(30),
        }
    }
}

impl CrmConfig {
    /// Defaults, then `path` (or `$HRDISC_CONFIG`), then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::from_sources(path, &env)
    }

    /// Merge a config file and an environment map over the defaults
    pub fn from_sources(path: Option<&Path>, env: &HashMap<String, String>) -> Result<Self> {
        let file = path
            .map(Path::to_path_buf)
            .or_else(|| non_empty(env.get(ENV_CONFIG)).map(PathBuf::from));

        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        Ok(config)
    }

    /// Parse a JSON config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read '{}': {e}", path.display())))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("'{}': {e}", path.display())))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Override fields from `HRDISC_*` variables; empty values are ignored
    pub fn apply_env(&mut self, env: &HashMap<String, String>) -> Result<()> {
        if let Some(id) = non_empty(env.get(ENV_SHEET_ID)) {
            self.spreadsheet_id = Some(id.to_string());
        }
        if let Some(title) = non_empty(env.get(ENV_WORKSHEET)) {
            self.worksheet = title.to_string();
        }
        if let Some(path) = non_empty(env.get(ENV_CREDENTIALS)) {
            self.credentials_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = non_empty(env.get(ENV_REFRESH_SECS)) {
            let secs = secs
                .parse::<u64>()
                .map_err(|_| Error::Config(format!("{ENV_REFRESH_SECS} must be a whole number of seconds")))?;
            self.refresh_secs = Some(secs);
        }
        Ok(())
    }

    /// Whether both a document and a key are configured
    pub fn remote_configured(&self) -> bool {
        self.spreadsheet_id.is_some() && self.credentials_path.is_some()
    }

    /// Auto-refresh interval; zero disables it
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_secs.filter(|&s| s > 0).map(Duration::from_secs)
    }

    /// Remote request timeout
    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    /// Loader settings
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            preferred: self.worksheet.clone(),
            fallbacks: self.fallback_worksheets.clone(),
            clean: CleanOptions::default(),
        }
    }

    /// Display settings
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            truncate_threshold: self.truncate_threshold,
            summary_len: self.summary_len,
        }
    }

    /// Row-building settings for remote writes
    pub fn row_write_options(&self) -> RowWriteOptions {
        RowWriteOptions {
            escape_narrative_quotes: self.escape_narrative_quotes,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}
