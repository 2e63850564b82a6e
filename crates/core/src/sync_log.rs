// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-record sync outcomes.
//!
//! Every remote create, update or failure is appended to the `sync_log`
//! table so a human can see why a lead keeps coming back dirty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Which way data was moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    Push,
    Pull,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::Push => "push",
            SyncDirection::Pull => "pull",
        }
    }
}

impl fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "push" => Ok(SyncDirection::Push),
            "pull" => Ok(SyncDirection::Pull),
            _ => Err(Error::InvalidInput(format!("invalid sync direction: '{s}'"))),
        }
    }
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// A new record appeared on the other side.
    Created,
    /// An existing record was overwritten on the other side.
    Updated,
    /// The record could not be synced and stays as it was.
    Failed,
    /// Pending changes were dropped on request.
    Abandoned,
}

impl SyncOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Created => "created",
            SyncOutcome::Updated => "updated",
            SyncOutcome::Failed => "failed",
            SyncOutcome::Abandoned => "abandoned",
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncOutcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "created" => Ok(SyncOutcome::Created),
            "updated" => Ok(SyncOutcome::Updated),
            "failed" => Ok(SyncOutcome::Failed),
            "abandoned" => Ok(SyncOutcome::Abandoned),
            _ => Err(Error::InvalidInput(format!("invalid sync outcome: '{s}'"))),
        }
    }
}

/// A row of the sync log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncLogEntry {
    pub id: i64,
    /// Local lead, when the record made it into the store.
    pub lead_id: Option<i64>,
    pub remote_id: Option<String>,
    pub direction: SyncDirection,
    pub outcome: SyncOutcome,
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
