// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync commands.
//!
//! Summaries are printed before the exit status is decided, so a partial
//! failure still shows what did go through.

use lead_core::LeadCache;

use crate::cli::OutputFormat;
use crate::display::{format_log_entry, format_pull_summary, format_push_summary};
use crate::error::{Error, Result};
use crate::sync::{PullSummary, PushSummary, RemoteTable, SyncManager};

use super::{print_json, print_lines};

fn push_outcome(summary: &PushSummary) -> Result<()> {
    if summary.success() {
        Ok(())
    } else {
        Err(Error::SyncIncomplete {
            operation: "push",
            failed: summary.failed,
        })
    }
}

fn pull_outcome(summary: &PullSummary) -> Result<()> {
    if let Some(err) = &summary.fetch_error {
        return Err(Error::PullAborted(err.clone()));
    }
    if summary.failed > 0 {
        return Err(Error::SyncIncomplete {
            operation: "pull",
            failed: summary.failed,
        });
    }
    Ok(())
}

pub fn push<R: RemoteTable>(
    manager: &SyncManager<R>,
    cache: &LeadCache,
    output: OutputFormat,
) -> Result<()> {
    let summary = manager.push_to_remote(cache)?;
    match output {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => print_lines(&format_push_summary(&summary)),
    }
    push_outcome(&summary)
}

pub fn pull<R: RemoteTable>(
    manager: &SyncManager<R>,
    cache: &LeadCache,
    if_stale: bool,
    output: OutputFormat,
) -> Result<()> {
    let summary = if if_stale {
        match manager.pull_if_stale(cache, cache.max_age())? {
            Some(summary) => summary,
            None => {
                match output {
                    OutputFormat::Json => print_json(&serde_json::Value::Null)?,
                    OutputFormat::Text => println!("Cache is fresh, skipping pull"),
                }
                return Ok(());
            }
        }
    } else {
        manager.pull_from_remote(cache)?
    };
    match output {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => print_lines(&format_pull_summary(&summary)),
    }
    pull_outcome(&summary)
}

pub fn sync<R: RemoteTable>(
    manager: &SyncManager<R>,
    cache: &LeadCache,
    output: OutputFormat,
) -> Result<()> {
    let report = manager.sync_bidirectional(cache)?;
    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            print_lines(&format_push_summary(&report.first_push));
            print_lines(&format_pull_summary(&report.pull));
            if report.second_push.attempted > 0 {
                print_lines(&format_push_summary(&report.second_push));
            }
        }
    }
    if report.overall_success {
        return Ok(());
    }
    pull_outcome(&report.pull)?;
    Err(Error::SyncIncomplete {
        operation: "sync",
        failed: report.first_push.failed + report.pull.failed + report.second_push.failed,
    })
}

pub fn abandon(cache: &LeadCache, id: i64) -> Result<()> {
    cache.abandon_sync(id)?;
    println!("Abandoned pending changes for lead {id}");
    Ok(())
}

pub fn log(cache: &LeadCache, limit: usize) -> Result<()> {
    let entries = cache.database().recent_sync_log(limit)?;
    if entries.is_empty() {
        println!("No sync activity yet");
    }
    for entry in &entries {
        println!("{}", format_log_entry(entry));
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
