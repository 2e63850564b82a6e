// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{CONFIG_FILE_NAME, MAX_AGE_HOURS_LIMIT};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "leadsync")]
#[command(version)]
#[command(about = "Local lead cache with two-way sync to an Airtable table")]
pub struct Cli {
    /// Config file
    #[arg(long, global = true, env = "LEADSYNC_CONFIG", default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Database file (overrides the config)
    #[arg(long, global = true, env = "LEADSYNC_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Content fields accepted by `add`.
#[derive(Args, Debug, Default)]
pub struct LeadArgs {
    /// Full name
    #[arg(long, value_parser = non_empty_string)]
    pub name: String,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub title: Option<String>,

    /// LinkedIn profile URL
    #[arg(long)]
    pub linkedin: Option<String>,

    /// Company website
    #[arg(long)]
    pub website: Option<String>,

    /// Pipeline status (default: new)
    #[arg(long)]
    pub status: Option<String>,

    /// Where the lead came from (kept locally, never pushed)
    #[arg(long)]
    pub source: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show cache totals, pending pushes and freshness
    Stats {
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// List leads
    List {
        /// Only leads with this exact status
        #[arg(long, short)]
        status: Option<String>,

        /// Only leads waiting to be pushed
        #[arg(long)]
        dirty: bool,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Search leads by name or company (case-insensitive)
    Search {
        query: String,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Show one lead as JSON
    Show { id: i64 },

    /// Add a lead locally (pushed on the next sync)
    Add {
        #[command(flatten)]
        lead: LeadArgs,
    },

    /// Set fields on a lead: FIELD=VALUE, or FIELD= to clear
    Set {
        id: i64,

        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Delete a lead locally
    Delete { id: i64 },

    /// Push dirty leads to the remote table
    Push {
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Pull the remote table into the cache (remote wins)
    Pull {
        /// Skip the pull if the cache is still fresh
        #[arg(long)]
        if_stale: bool,

        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Push, pull, then push again
    Sync {
        #[arg(long, short, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Exit 0 if the last pull is within the freshness budget, 1 otherwise
    Fresh {
        /// Override max_age_hours from the config
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_AGE_HOURS_LIMIT))]
        max_age_hours: Option<i64>,
    },

    /// Stop retrying a lead's pending changes
    Abandon { id: i64 },

    /// Remove leads with duplicate emails, keeping the newest
    Dedup,

    /// Show recent sync outcomes
    Log {
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
