// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};

use lead_core::{CacheStats, LeadRecord, SyncLogEntry};

use crate::sync::{PullSummary, PushSummary, RecordError};

/// Format a timestamp for human output.
pub fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// One-line summary of a lead.
///
/// Format: `  12 contacted  Ada Lovelace (Analytical Engines) <ada@example.com> *`
/// The trailing `*` marks a lead waiting to be pushed.
pub fn format_lead_line(lead: &LeadRecord) -> String {
    let mut line = format!(
        "{:>4} {:<10} {}",
        lead.id,
        lead.status,
        lead.full_name.as_deref().unwrap_or("(no name)")
    );
    if let Some(company) = lead.company.as_deref() {
        line.push_str(&format!(" ({company})"));
    }
    if let Some(email) = lead.email.as_deref() {
        line.push_str(&format!(" <{email}>"));
    }
    if lead.dirty {
        line.push_str(" *");
    }
    line
}

pub fn format_stats(stats: &CacheStats) -> Vec<String> {
    let mut lines = vec![format!("Leads: {}", stats.total)];
    for (status, count) in &stats.status_counts {
        lines.push(format!("  {status}: {count}"));
    }
    lines.push(format!("Pending push: {}", stats.pending_sync_count));
    let last = match stats.last_sync_at {
        Some(at) => format_time(at),
        None => "never".to_string(),
    };
    let freshness = if stats.is_fresh { "fresh" } else { "stale" };
    lines.push(format!("Last pull: {last} ({freshness})"));
    lines
}

fn format_record_error(error: &RecordError) -> String {
    let subject = match (error.lead_id, error.remote_id.as_deref()) {
        (Some(id), _) => format!("lead {id}"),
        (None, Some(remote_id)) => remote_id.to_string(),
        (None, None) => "fetch".to_string(),
    };
    format!("  {subject}: {}", error.message)
}

pub fn format_push_summary(summary: &PushSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Pushed {} of {} lead(s), {} failed",
        summary.succeeded, summary.attempted, summary.failed
    )];
    lines.extend(summary.errors.iter().map(format_record_error));
    lines
}

pub fn format_pull_summary(summary: &PullSummary) -> Vec<String> {
    let mut lines = match &summary.fetch_error {
        Some(_) => vec!["Pull aborted, nothing applied".to_string()],
        None => vec![format!(
            "Pulled {} record(s): {} created, {} updated, {} failed",
            summary.fetched, summary.created, summary.updated, summary.failed
        )],
    };
    lines.extend(summary.errors.iter().map(format_record_error));
    lines
}

/// Format: `2026-03-01 09:00 push created   lead 3 rec0001`
pub fn format_log_entry(entry: &SyncLogEntry) -> String {
    let mut line = format!(
        "{} {:<4} {:<9}",
        format_time(entry.created_at),
        entry.direction.as_str(),
        entry.outcome.as_str()
    );
    if let Some(id) = entry.lead_id {
        line.push_str(&format!(" lead {id}"));
    }
    if let Some(remote_id) = entry.remote_id.as_deref() {
        line.push_str(&format!(" {remote_id}"));
    }
    if let Some(detail) = entry.detail.as_deref() {
        line.push_str(&format!(": {detail}"));
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
