// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote table abstraction.
//!
//! The sync manager only ever talks to a [`RemoteTable`], so tests can drive
//! it with an in-memory table instead of the HTTP client.

use lead_core::Fields;
use serde::Deserialize;

/// Error type for remote table operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Rate limits, server errors, network failures and unreadable responses.
    /// Retrying later may succeed.
    #[error("transient: {0}")]
    Transient(String),

    /// The remote refused the request. Retrying unchanged will not help.
    #[error("rejected: HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The client is missing credentials or table coordinates.
    #[error("{0}")]
    Config(String),
}

impl RemoteError {
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Transient(_))
    }
}

/// Result type for remote table operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// A record as the remote table returns it, keyed by remote column names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    #[serde(default, rename = "createdTime")]
    pub created_time: Option<String>,
    #[serde(default)]
    pub fields: Fields,
}

/// One page of a list request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RemotePage {
    #[serde(default)]
    pub records: Vec<RemoteRecord>,
    /// Cursor for the next page; absent on the last page.
    #[serde(default)]
    pub offset: Option<String>,
}

/// A remote table of lead records.
pub trait RemoteTable {
    /// Check credentials and table coordinates without touching the network.
    fn preflight(&self) -> RemoteResult<()>;

    /// Fetch one page, starting at `offset` (or the first page for `None`).
    fn list_page(&self, offset: Option<&str>) -> RemoteResult<RemotePage>;

    /// Create a record and return it with its remote id.
    fn create(&self, fields: &Fields) -> RemoteResult<RemoteRecord>;

    /// Overwrite the given columns of an existing record.
    fn update(&self, id: &str, fields: &Fields) -> RemoteResult<RemoteRecord>;
}
