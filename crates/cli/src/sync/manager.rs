// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Push, pull and bidirectional sync between the cache and a remote table.
//!
//! Push sends dirty leads one at a time. A failure leaves that lead dirty
//! with its error recorded and moves on to the next one. Pull fetches every
//! page before it writes anything locally, then overwrites matching leads
//! (last pull wins).

use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use lead_core::lead::value_to_text;
use lead_core::{
    FieldMap, LeadCache, LeadField, LeadPatch, LeadRecord, NewLead, SyncDirection, SyncOutcome,
    WriteOrigin,
};

use super::remote::{RemoteError, RemoteRecord, RemoteResult, RemoteTable};
use crate::error::{Error, Result};

/// Why a single record did not sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordError {
    pub lead_id: Option<i64>,
    pub remote_id: Option<String>,
    /// Retrying later may succeed.
    pub transient: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PushSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<RecordError>,
}

impl PushSummary {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PullSummary {
    /// Records returned by the remote.
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Set when listing the remote failed and nothing was applied.
    pub fetch_error: Option<String>,
    pub errors: Vec<RecordError>,
}

impl PullSummary {
    pub fn success(&self) -> bool {
        self.fetch_error.is_none() && self.failed == 0
    }
}

/// Outcome of [`SyncManager::sync_bidirectional`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub first_push: PushSummary,
    pub pull: PullSummary,
    pub second_push: PushSummary,
    pub overall_success: bool,
}

/// Moves leads between a [`LeadCache`] and a [`RemoteTable`].
pub struct SyncManager<R: RemoteTable> {
    remote: R,
    field_map: FieldMap,
    push_delay: Duration,
}

impl<R: RemoteTable> SyncManager<R> {
    pub fn new(remote: R, field_map: FieldMap) -> Self {
        SyncManager {
            remote,
            field_map,
            push_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive writes during a push.
    pub fn with_push_delay(mut self, delay: Duration) -> Self {
        self.push_delay = delay;
        self
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Fails the whole call before any record is touched.
    fn preflight(&self) -> Result<()> {
        self.remote
            .preflight()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Send every dirty lead to the remote.
    ///
    /// Leads without a remote id are created, the rest are updated. Only a
    /// missing configuration or a local store failure aborts the batch.
    pub fn push_to_remote(&self, cache: &LeadCache) -> Result<PushSummary> {
        self.preflight()?;
        let db = cache.database();
        let dirty = db.list_dirty()?;
        let mut summary = PushSummary::default();

        for (index, lead) in dirty.iter().enumerate() {
            if index > 0 && !self.push_delay.is_zero() {
                thread::sleep(self.push_delay);
            }
            summary.attempted += 1;

            match self.push_one(lead) {
                Ok((record, outcome)) => {
                    db.mark_synced(lead.id, &record.id, cache.now())?;
                    db.record_sync_outcome(
                        Some(lead.id),
                        Some(&record.id),
                        SyncDirection::Push,
                        outcome,
                        None,
                    )?;
                    debug!(lead_id = lead.id, remote_id = %record.id, %outcome, "pushed lead");
                    summary.succeeded += 1;
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(lead_id = lead.id, error = %message, "push failed");
                    db.mark_sync_failed(lead.id, &message, cache.now())?;
                    db.record_sync_outcome(
                        Some(lead.id),
                        lead.remote_id.as_deref(),
                        SyncDirection::Push,
                        SyncOutcome::Failed,
                        Some(&message),
                    )?;
                    summary.failed += 1;
                    summary.errors.push(RecordError {
                        lead_id: Some(lead.id),
                        remote_id: lead.remote_id.clone(),
                        transient: err.is_transient(),
                        message,
                    });
                }
            }
        }

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "push finished"
        );
        Ok(summary)
    }

    fn push_one(&self, lead: &LeadRecord) -> RemoteResult<(RemoteRecord, SyncOutcome)> {
        let fields = self.field_map.record_to_remote(lead);
        match &lead.remote_id {
            Some(remote_id) => self
                .remote
                .update(remote_id, &fields)
                .map(|r| (r, SyncOutcome::Updated)),
            None => self
                .remote
                .create(&fields)
                .map(|r| (r, SyncOutcome::Created)),
        }
    }

    /// Overwrite the cache from the remote.
    ///
    /// Every page is fetched first. If listing fails nothing is applied,
    /// the summary carries the error and the last-sync time is unchanged.
    pub fn pull_from_remote(&self, cache: &LeadCache) -> Result<PullSummary> {
        self.preflight()?;
        let db = cache.database();
        let mut summary = PullSummary::default();

        let records = match self.fetch_all() {
            Ok(records) => records,
            Err(err) => {
                let message = err.to_string();
                warn!(error = %message, "pull aborted, nothing applied");
                summary.errors.push(RecordError {
                    lead_id: None,
                    remote_id: None,
                    transient: err.is_transient(),
                    message: message.clone(),
                });
                summary.fetch_error = Some(message);
                return Ok(summary);
            }
        };
        summary.fetched = records.len();

        for record in &records {
            match self.apply_remote_record(cache, record) {
                Ok((lead_id, outcome)) => {
                    match outcome {
                        SyncOutcome::Created => summary.created += 1,
                        _ => summary.updated += 1,
                    }
                    db.record_sync_outcome(
                        Some(lead_id),
                        Some(&record.id),
                        SyncDirection::Pull,
                        outcome,
                        None,
                    )?;
                }
                Err(err) => {
                    let message = err.to_string();
                    warn!(
                        remote_id = %record.id,
                        error = %message,
                        "could not apply remote record"
                    );
                    db.record_sync_outcome(
                        None,
                        Some(&record.id),
                        SyncDirection::Pull,
                        SyncOutcome::Failed,
                        Some(&message),
                    )?;
                    summary.failed += 1;
                    summary.errors.push(RecordError {
                        lead_id: None,
                        remote_id: Some(record.id.clone()),
                        transient: false,
                        message,
                    });
                }
            }
        }

        db.set_last_global_sync_at(cache.now())?;
        info!(
            fetched = summary.fetched,
            created = summary.created,
            updated = summary.updated,
            failed = summary.failed,
            "pull finished"
        );
        Ok(summary)
    }

    fn fetch_all(&self) -> RemoteResult<Vec<RemoteRecord>> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        loop {
            let page = self.remote.list_page(offset.as_deref())?;
            records.extend(page.records);
            match page.offset {
                Some(next) if offset.as_deref() == Some(next.as_str()) => {
                    return Err(RemoteError::Transient(format!(
                        "pagination did not advance past offset {next}"
                    )));
                }
                Some(next) => offset = Some(next),
                None => return Ok(records),
            }
        }
    }

    /// Write one remote record into the cache.
    ///
    /// Matches on remote id first, then on email, and creates a new lead
    /// when neither matches. Mapped columns missing from the record are
    /// cleared locally; local-only fields are left alone.
    fn apply_remote_record(
        &self,
        cache: &LeadCache,
        record: &RemoteRecord,
    ) -> lead_core::Result<(i64, SyncOutcome)> {
        let db = cache.database();
        let canonical = self.field_map.from_remote(&record.fields);
        let mut patch = LeadPatch::new();
        for field in self.field_map.mapped_fields() {
            let value = canonical.get(field.as_str()).and_then(value_to_text);
            patch.insert(field, value);
        }

        let existing = match db.get_by_remote_id(&record.id)? {
            Some(lead) => Some(lead),
            None => match patch.get(LeadField::Email).flatten() {
                Some(email) => db.find_by_email(email)?,
                None => None,
            },
        };

        let Some(lead) = existing else {
            let created = db.create(
                &NewLead::new(patch).with_remote_id(record.id.as_str()),
                WriteOrigin::Sync,
            )?;
            return Ok((created.id, SyncOutcome::Created));
        };

        if let Some(linked) = lead.remote_id.as_deref().filter(|l| *l != record.id) {
            return Err(lead_core::Error::InvalidInput(format!(
                "email matches lead {} which is already linked to remote record {linked}",
                lead.id
            )));
        }
        db.update(lead.id, &patch, WriteOrigin::Sync)?;
        if lead.remote_id.is_none() {
            db.mark_synced(lead.id, &record.id, cache.now())?;
        }
        Ok((lead.id, SyncOutcome::Updated))
    }

    /// Push, pull, then push again.
    ///
    /// The second push picks up anything that became dirty while the pull
    /// ran and retries what the first push could not send.
    pub fn sync_bidirectional(&self, cache: &LeadCache) -> Result<SyncReport> {
        let first_push = self.push_to_remote(cache)?;
        let pull = self.pull_from_remote(cache)?;
        let second_push = self.push_to_remote(cache)?;
        let overall_success = first_push.success() && pull.success() && second_push.success();
        Ok(SyncReport {
            first_push,
            pull,
            second_push,
            overall_success,
        })
    }

    /// Pull only if the cache is older than `max_age`.
    pub fn pull_if_stale(
        &self,
        cache: &LeadCache,
        max_age: chrono::Duration,
    ) -> Result<Option<PullSummary>> {
        if cache.is_fresh(max_age)? {
            debug!("cache is fresh, skipping pull");
            return Ok(None);
        }
        self.pull_from_remote(cache).map(Some)
    }

    /// Drop a lead's pending changes so push stops retrying it.
    pub fn abandon(&self, cache: &LeadCache, lead_id: i64) -> Result<()> {
        cache.abandon_sync(lead_id)?;
        info!(lead_id, "abandoned pending changes");
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
