// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sync for the lead cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  LeadCache  │◄───►│ SyncManager │────►│ RemoteTable │
//! │  (SQLite)   │     │ (FieldMap)  │◄────│   (trait)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │  Airtable   │
//!                                         │  REST API   │
//!                                         └─────────────┘
//! ```
//!
//! # Features
//!
//! - Push dirty leads one at a time with a courtesy delay
//! - Pull every page before applying, last pull wins
//! - Per-record outcomes in the sync log
//! - Injectable remote table trait for testing

mod airtable;
mod manager;
mod remote;

pub use airtable::AirtableClient;
pub use manager::{PullSummary, PushSummary, RecordError, SyncManager, SyncReport};
pub use remote::{RemoteError, RemotePage, RemoteRecord, RemoteResult, RemoteTable};

#[cfg(test)]
pub(crate) mod test_helpers;
