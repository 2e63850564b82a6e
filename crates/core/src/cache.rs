// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync-aware cache over the lead store.
//!
//! [`LeadCache`] is what application code talks to. Reads never reach the
//! remote table; writes mark leads dirty so the next push picks them up.
//! Freshness is judged against a single process-wide "last pull" timestamp
//! kept in the store.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::clock::Clock;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::lead::{Fields, LeadField, LeadFilter, LeadPatch, LeadRecord, NewLead, WriteOrigin};
use crate::sync_log::{SyncDirection, SyncOutcome};

/// Default budget used by [`LeadCache::stats`].
pub const DEFAULT_MAX_AGE_HOURS: i64 = 24;

/// Aggregate view of the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub pending_sync_count: usize,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub is_fresh: bool,
}

/// Lead cache backed by a [`Database`].
pub struct LeadCache {
    db: Database,
    max_age: Duration,
}

impl LeadCache {
    pub fn new(db: Database) -> Self {
        LeadCache {
            db,
            max_age: Duration::hours(DEFAULT_MAX_AGE_HOURS),
        }
    }

    /// Open (and migrate) the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(LeadCache::new(Database::open(path)?))
    }

    /// Open an in-memory cache driven by `clock` (for testing).
    pub fn in_memory(clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(LeadCache::new(Database::open_in_memory()?.with_clock(clock)))
    }

    /// Set the freshness budget reported by [`LeadCache::stats`].
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// The underlying store, for the sync manager and cleanup paths.
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.db.now()
    }

    /// Ingest a new lead. It stays dirty until pushed.
    pub fn create(&self, lead: &NewLead) -> Result<LeadRecord> {
        self.db.create(lead, WriteOrigin::Local)
    }

    pub fn get(&self, id: i64) -> Result<LeadRecord> {
        self.db.get(id)
    }

    /// Leads with an exact status. Does not trigger a sync.
    pub fn get_by_status(&self, status: &str) -> Result<Vec<LeadRecord>> {
        self.db.query(&LeadFilter::new().eq(LeadField::Status, status))
    }

    /// Case-insensitive substring match over name and company.
    pub fn search(&self, needle: &str) -> Result<Vec<LeadRecord>> {
        let needle = needle.trim().to_lowercase();
        let leads = self.db.all()?;
        if needle.is_empty() {
            return Ok(leads);
        }
        Ok(leads
            .into_iter()
            .filter(|lead| lead.matches_lowercase(&needle))
            .collect())
    }

    /// Write fields locally and mark the lead dirty.
    ///
    /// Returns `Ok(false)` if the lead does not exist. Unknown field names
    /// and duplicate emails are still errors.
    pub fn update(&self, id: i64, fields: &Fields) -> Result<bool> {
        let patch = LeadPatch::from_fields(fields)?;
        self.update_patch(id, &patch)
    }

    /// Typed variant of [`LeadCache::update`].
    pub fn update_patch(&self, id: i64, patch: &LeadPatch) -> Result<bool> {
        match self.db.update(id, patch, WriteOrigin::Local) {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn list_dirty(&self) -> Result<Vec<LeadRecord>> {
        self.db.list_dirty()
    }

    /// Stop retrying a lead's pending changes and note it in the sync log.
    pub fn abandon_sync(&self, id: i64) -> Result<()> {
        let lead = self.db.get(id)?;
        self.db.abandon_sync(id)?;
        self.db.record_sync_outcome(
            Some(id),
            lead.remote_id.as_deref(),
            SyncDirection::Push,
            SyncOutcome::Abandoned,
            lead.sync_error.as_deref(),
        )?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.db.delete(id)
    }

    pub fn dedup_emails(&self) -> Result<Vec<i64>> {
        self.db.dedup_emails()
    }

    /// Returns true if the last complete pull happened within `max_age`.
    ///
    /// A cache that has never been pulled is stale.
    pub fn is_fresh(&self, max_age: Duration) -> Result<bool> {
        Ok(match self.db.last_global_sync_at()? {
            Some(at) => self.now() - at <= max_age,
            None => false,
        })
    }

    pub fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            total: self.db.count()?,
            status_counts: self.db.status_counts()?,
            pending_sync_count: self.db.dirty_count()?,
            last_sync_at: self.db.last_global_sync_at()?,
            is_fresh: self.is_fresh(self.max_age)?,
        })
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
