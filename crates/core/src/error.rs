// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lead-core operations.

use thiserror::Error;

/// All possible errors that can occur in lead-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("lead not found: {0}")]
    NotFound(i64),

    #[error("email '{email}' already belongs to lead {existing_id}\n  hint: update lead {existing_id} instead of creating a new one")]
    DuplicateEmail { email: String, existing_id: i64 },

    #[error(
        "unknown lead field: '{0}'\n  hint: valid fields are: {names}",
        names = crate::lead::LeadField::names()
    )]
    InvalidField(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for lead-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
