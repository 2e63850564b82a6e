// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! lead-core: Local lead cache for the outreach pipeline.
//!
//! This crate provides the lead model, the SQLite-backed lead store, the
//! static field mapper used to talk to the remote lead table, and the
//! sync-aware cache that application code reads and writes through. The
//! remote client and sync manager live in the `leadsync` crate.

pub mod cache;
pub mod clock;
pub mod db;
pub mod error;
pub mod field_map;
pub mod lead;
pub mod sync_log;

pub use cache::{CacheStats, LeadCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use field_map::FieldMap;
pub use lead::{Fields, LeadField, LeadFilter, LeadPatch, LeadRecord, NewLead, WriteOrigin};
pub use sync_log::{SyncDirection, SyncLogEntry, SyncOutcome};
