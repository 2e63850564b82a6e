// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `leadsync.toml` configuration.
//!
//! Every key is optional. A missing file means defaults everywhere and no
//! remote, so local commands keep working until a `[remote]` section is
//! added. The API token never lives in the file; `remote.token_env` names
//! the environment variable that holds it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lead_core::cache::DEFAULT_MAX_AGE_HOURS;

use crate::error::{Error, Result};

pub const CONFIG_FILE_NAME: &str = "leadsync.toml";

/// Largest accepted freshness budget, in hours (about a century).
pub const MAX_AGE_HOURS_LIMIT: i64 = 24 * 366 * 100;
const DB_FILE_NAME: &str = "leads.db";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database path, relative to the directory holding the config file.
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Freshness budget used by `stats`, `fresh` and `pull --if-stale`.
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: i64,
    /// Remote table (optional - if absent, only local commands work).
    pub remote: Option<RemoteConfig>,
}

/// Airtable table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteConfig {
    pub base_id: String,
    pub table_name: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Records per list request (Airtable caps this at 100).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Pause between consecutive writes during a push.
    #[serde(default = "default_push_delay_ms")]
    pub push_delay_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_database() -> PathBuf {
    PathBuf::from(DB_FILE_NAME)
}

fn default_max_age_hours() -> i64 {
    DEFAULT_MAX_AGE_HOURS
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_token_env() -> String {
    "AIRTABLE_API_KEY".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_push_delay_ms() -> u64 {
    200
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: default_database(),
            max_age_hours: default_max_age_hours(),
            remote: None,
        }
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        if !(0..=MAX_AGE_HOURS_LIMIT).contains(&config.max_age_hours) {
            return Err(Error::Config(format!(
                "max_age_hours must be between 0 and {MAX_AGE_HOURS_LIMIT}, got {}",
                config.max_age_hours
            )));
        }
        Ok(config)
    }

    /// Load the config at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, including when it
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Config::parse(&text)
    }

    /// Load the config at `path`, falling back to defaults if it is missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Config::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve the database path against the config file's directory.
    pub fn database_path(&self, config_path: &Path) -> PathBuf {
        if self.database.is_absolute() {
            return self.database.clone();
        }
        match config_path.parent() {
            Some(dir) => dir.join(&self.database),
            None => self.database.clone(),
        }
    }

    /// The freshness budget. Out-of-range hours are clamped.
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(self.max_age_hours.clamp(0, MAX_AGE_HOURS_LIMIT))
    }

    /// The remote section, or a config error naming what is missing.
    pub fn require_remote(&self) -> Result<&RemoteConfig> {
        self.remote.as_ref().ok_or_else(|| {
            Error::Config("no [remote] section: base_id and table_name are required".to_string())
        })
    }
}

impl RemoteConfig {
    /// Read the API token from the configured environment variable.
    ///
    /// Unset and blank values both count as missing.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    pub fn push_delay(&self) -> Duration {
        Duration::from_millis(self.push_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
