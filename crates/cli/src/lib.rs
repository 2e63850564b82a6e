// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! leadsync - Local lead cache with two-way Airtable sync.
//!
//! This crate provides the remote side of the lead cache: the Airtable
//! client, the sync manager and the `leadsync` command line. Storage, the
//! lead model and the field mapping live in `lead-core`.
//!
//! # Main Components
//!
//! - [`SyncManager`](sync::SyncManager) - push, pull and bidirectional sync
//! - [`AirtableClient`](sync::AirtableClient) - blocking Airtable REST client
//! - [`Config`] - `leadsync.toml` (database path, freshness budget, remote table)
//! - [`Error`] - Error types for all commands
//!
//! # Syncing from code
//!
//! ```rust,ignore
//! use leadsync::{commands, Config};
//!
//! let config = Config::load_or_default(Path::new("leadsync.toml"))?;
//! let cache = commands::open_cache(&config, Path::new("leads.db"))?;
//! let manager = commands::sync_manager(&config)?;
//! let report = manager.sync_bidirectional(&cache)?;
//! ```

mod cli;
pub mod commands;
mod display;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, LeadArgs, OutputFormat};
pub use config::Config;
pub use error::{Error, Result};

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config.database_path(&cli.config));
    let cache = commands::open_cache(&config, &db_path)?;

    match cli.command {
        Command::Stats { output } => commands::stats::stats(&cache, output),
        Command::List {
            status,
            dirty,
            output,
        } => commands::lead::list(&cache, status.as_deref(), dirty, output),
        Command::Search { query, output } => commands::lead::search(&cache, &query, output),
        Command::Show { id } => commands::lead::show(&cache, id),
        Command::Add { lead } => commands::lead::add(&cache, lead),
        Command::Set { id, assignments } => commands::lead::set(&cache, id, &assignments),
        Command::Delete { id } => commands::lead::delete(&cache, id),
        Command::Push { output } => {
            let manager = commands::sync_manager(&config)?;
            commands::sync::push(&manager, &cache, output)
        }
        Command::Pull { if_stale, output } => {
            let manager = commands::sync_manager(&config)?;
            commands::sync::pull(&manager, &cache, if_stale, output)
        }
        Command::Sync { output } => {
            let manager = commands::sync_manager(&config)?;
            commands::sync::sync(&manager, &cache, output)
        }
        Command::Fresh { max_age_hours } => {
            let max_age = match max_age_hours {
                Some(hours) => chrono::Duration::try_hours(hours).ok_or_else(|| {
                    Error::Config(format!("max_age_hours out of range: {hours}"))
                })?,
                None => config.max_age(),
            };
            commands::stats::fresh(&cache, max_age)
        }
        Command::Abandon { id } => commands::sync::abandon(&cache, id),
        Command::Dedup => commands::lead::dedup(&cache),
        Command::Log { limit } => commands::sync::log(&cache, limit),
    }
}
