// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the `leadsync` command line.
///
/// Store-level failures are passed through unchanged from [`lead_core::Error`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] lead_core::Error),

    #[error("configuration error: {0}\n  hint: check leadsync.toml and the API token environment variable")]
    Config(String),

    #[error("invalid assignment '{0}'\n  hint: use FIELD=VALUE, or FIELD= to clear")]
    InvalidAssignment(String),

    #[error("cache is stale (last pull: {last_sync})")]
    Stale { last_sync: String },

    #[error("{operation} finished with {failed} failed record(s)\n  hint: run 'leadsync log' to see why")]
    SyncIncomplete {
        operation: &'static str,
        failed: usize,
    },

    #[error("pull aborted, nothing applied: {0}")]
    PullAborted(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
