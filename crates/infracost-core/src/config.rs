//! Configuration Loader
//!
//! Two layers, both read once at startup:
//!
//! 1. An optional environment file (`INFRACOST_ENV_FILE`, else `.env`) whose
//!    `KEY=VALUE` lines are exported into the process environment without
//!    overriding variables that are already set.
//! 2. [`Settings`], built with the `config` crate from an optional TOML file
//!    and `INFRACOST_*` environment variables (environment wins).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use infracost_core::config::{load_environment, Settings};
//!
//! load_environment(None);
//! let settings = Settings::load(None).unwrap();
//! let config = settings.infracost_config();
//! ```

use config::{Config, Environment, File};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Variable naming a custom environment file
pub const ENV_FILE_VAR: &str = "INFRACOST_ENV_FILE";

/// Variable holding the Infracost Cloud service token
pub const SERVICE_TOKEN_VAR: &str = "INFRACOST_SERVICE_TOKEN";

/// Variable holding the default organization slug
pub const ORG_VAR: &str = "INFRACOST_ORG";

/// Fallback environment files (in order of priority)
pub const ENV_FILE_PATHS: &[&str] = &[".env"];

const ENV_PREFIX: &str = "INFRACOST";

/// Load environment variables from an env file.
///
/// Checks `explicit`, then `INFRACOST_ENV_FILE`, then `.env` in the working
/// directory. Existing environment variables are never overridden.
///
/// Returns the path that was loaded, or None if no file was found.
pub fn load_environment(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if let Some(loaded) = try_load_env_file(path) {
            return Some(loaded);
        }
        warn!(path = %path.display(), "Environment file not found");
    }

    if let Ok(custom_path) = std::env::var(ENV_FILE_VAR) {
        if let Some(loaded) = try_load_env_file(Path::new(&custom_path)) {
            return Some(loaded);
        }
    }

    for path in ENV_FILE_PATHS {
        if let Some(loaded) = try_load_env_file(Path::new(path)) {
            return Some(loaded);
        }
    }

    debug!("No environment file found, using existing environment");
    None
}

fn try_load_env_file(path: &Path) -> Option<PathBuf> {
    if !path.exists() {
        return None;
    }

    match fs::read_to_string(path) {
        Ok(content) => {
            let mut loaded_count = 0;
            let mut skipped_count = 0;

            for (key, value) in content.lines().filter_map(parse_env_line) {
                if std::env::var_os(&key).is_some() {
                    skipped_count += 1;
                    debug!("Skipped (already set): {}", key);
                    continue;
                }
                std::env::set_var(&key, &value);
                loaded_count += 1;
                debug!("Loaded: {}={}", key, redact(&key, &value));
            }

            info!(
                "Loaded {} environment variables from {} ({} skipped - already set)",
                loaded_count,
                path.display(),
                skipped_count
            );
            Some(path.to_path_buf())
        }
        Err(e) => {
            warn!("Failed to read environment file {}: {}", path.display(), e);
            None
        }
    }
}

fn redact<'a>(key: &str, value: &'a str) -> &'a str {
    if key.contains("KEY") || key.contains("TOKEN") || key.contains("SECRET") {
        "***"
    } else {
        value
    }
}

/// Parse a single environment line into key-value pair.
///
/// Handles `KEY=VALUE`, `KEY="VALUE"`, `KEY='VALUE'` and an optional
/// leading `export`. Comments and blank lines yield None.
pub fn parse_env_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);

    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() {
        return None;
    }

    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.to_string(), value.to_string()))
}

/// Raw settings as read from file and environment.
///
/// Environment keys map as `INFRACOST_SERVICE_TOKEN` -> `service_token`,
/// `INFRACOST_ORG` -> `org`, `INFRACOST_BIN` -> `bin`,
/// `INFRACOST_API_URL` -> `api_url`,
/// `INFRACOST_MAX_OUTPUT_BYTES` -> `max_output_bytes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub service_token: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    #[serde(default)]
    pub bin: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub max_output_bytes: Option<usize>,
}

impl Settings {
    /// Read settings from the process environment and an optional file
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        Self::from_sources(config_file, None)
    }

    /// Read settings with an explicit environment map instead of the
    /// process environment when `env` is given.
    pub fn from_sources(
        config_file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).source(env));

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings.normalized())
    }

    fn normalized(self) -> Self {
        Self {
            service_token: non_empty(self.service_token),
            org: non_empty(self.org),
            bin: non_empty(self.bin),
            api_url: non_empty(self.api_url),
            max_output_bytes: self.max_output_bytes.filter(|n| *n > 0),
        }
    }

    /// Process-wide cloud configuration derived from these settings
    pub fn infracost_config(&self) -> InfracostConfig {
        InfracostConfig {
            service_token: self.service_token.clone(),
            org_slug: self.org.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Read-only cloud configuration shared by every call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfracostConfig {
    pub service_token: Option<String>,
    pub org_slug: Option<String>,
}

impl InfracostConfig {
    pub fn new(service_token: Option<String>, org_slug: Option<String>) -> Self {
        Self {
            service_token: non_empty(service_token),
            org_slug: non_empty(org_slug),
        }
    }

    /// Startup-safe description of the token: first 8 characters only
    pub fn token_summary(&self) -> String {
        match &self.service_token {
            Some(token) => {
                let prefix: String = token.chars().take(8).collect();
                format!("Set ({}...)", prefix)
            }
            None => "Not set".to_string(),
        }
    }

    pub fn org_summary(&self) -> &str {
        self.org_slug.as_deref().unwrap_or("Not set")
    }
}
