// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Core lead types.
//!
//! [`LeadRecord`] is the canonical unit stored locally. [`LeadField`] names its
//! content columns; [`LeadPatch`] and [`LeadFilter`] are built from those names
//! so that raw field strings only appear at the edges ([`Fields`] maps handed
//! to or received from the remote table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Loosely typed field map exchanged with the remote system.
pub type Fields = serde_json::Map<String, Value>;

/// Well-known lead statuses. Status is free text; these are the values the
/// pipeline stages write.
pub mod status {
    pub const NEW: &str = "new";
    pub const SCRAPED: &str = "scraped";
    pub const ENRICHED: &str = "enriched";
    pub const CONTACTED: &str = "contacted";
    pub const RESPONDED: &str = "responded";
}

/// Canonical content fields of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    FullName,
    Company,
    Email,
    Title,
    LinkedinUrl,
    Website,
    Status,
    /// AI-generated outreach message.
    Message,
    CompanyDescription,
    /// Date the lead was first contacted, as text.
    ContactedAt,
    /// Where the lead was ingested from. Never leaves the local store.
    Source,
}

impl LeadField {
    /// Every content field, in column order.
    pub const ALL: [LeadField; 11] = [
        LeadField::FullName,
        LeadField::Company,
        LeadField::Email,
        LeadField::Title,
        LeadField::LinkedinUrl,
        LeadField::Website,
        LeadField::Status,
        LeadField::Message,
        LeadField::CompanyDescription,
        LeadField::ContactedAt,
        LeadField::Source,
    ];

    /// Returns the canonical name, which is also the SQLite column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::FullName => "full_name",
            LeadField::Company => "company",
            LeadField::Email => "email",
            LeadField::Title => "title",
            LeadField::LinkedinUrl => "linkedin_url",
            LeadField::Website => "website",
            LeadField::Status => "status",
            LeadField::Message => "message",
            LeadField::CompanyDescription => "company_description",
            LeadField::ContactedAt => "contacted_at",
            LeadField::Source => "source",
        }
    }

    /// Comma-separated list of canonical names, for hints.
    pub fn names() -> String {
        LeadField::ALL
            .iter()
            .map(LeadField::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LeadField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        LeadField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::InvalidField(s.to_string()))
    }
}

/// Who is performing a write. Sync writes never mark a record dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrigin {
    /// Application code: the change must be pushed.
    Local,
    /// The sync manager applying remote data.
    Sync,
}

/// A lead as stored in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: i64,
    pub remote_id: Option<String>,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub linkedin_url: Option<String>,
    pub website: Option<String>,
    pub status: String,
    pub message: Option<String>,
    pub company_description: Option<String>,
    pub contacted_at: Option<String>,
    pub source: Option<String>,
    /// Local content changed since the last successful push.
    pub dirty: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub last_sync_attempt_at: Option<DateTime<Utc>>,
    pub sync_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadRecord {
    /// Returns the value of a content field.
    pub fn field(&self, field: LeadField) -> Option<&str> {
        match field {
            LeadField::FullName => self.full_name.as_deref(),
            LeadField::Company => self.company.as_deref(),
            LeadField::Email => self.email.as_deref(),
            LeadField::Title => self.title.as_deref(),
            LeadField::LinkedinUrl => self.linkedin_url.as_deref(),
            LeadField::Website => self.website.as_deref(),
            LeadField::Status => Some(self.status.as_str()),
            LeadField::Message => self.message.as_deref(),
            LeadField::CompanyDescription => self.company_description.as_deref(),
            LeadField::ContactedAt => self.contacted_at.as_deref(),
            LeadField::Source => self.source.as_deref(),
        }
    }

    /// All content fields under their canonical names. Empty fields are
    /// present as `null` so that a push clears them remotely.
    pub fn content_fields(&self) -> Fields {
        LeadField::ALL
            .iter()
            .map(|&field| {
                let value = self
                    .field(field)
                    .map(|v| Value::String(v.to_string()))
                    .unwrap_or(Value::Null);
                (field.as_str().to_string(), value)
            })
            .collect()
    }

    /// Returns true if either the name or the company contains `needle`,
    /// ignoring case. `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.full_name, &self.company]
            .into_iter()
            .flatten()
            .any(|v| v.to_lowercase().contains(needle))
    }
}

/// A partial update to a lead's content fields.
///
/// `None` values clear the field. Emails are trimmed, and a blank email
/// becomes `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    changes: BTreeMap<LeadField, Option<String>>,
}

impl LeadPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field to a value.
    pub fn set(mut self, field: LeadField, value: impl Into<String>) -> Self {
        self.insert(field, Some(value.into()));
        self
    }

    /// Clears a field.
    pub fn clear(mut self, field: LeadField) -> Self {
        self.insert(field, None);
        self
    }

    pub fn insert(&mut self, field: LeadField, value: Option<String>) {
        let value = match field {
            LeadField::Email => normalize_email(value),
            _ => value,
        };
        self.changes.insert(field, value);
    }

    /// Returns `Some(value)` if the patch touches `field`.
    pub fn get(&self, field: LeadField) -> Option<Option<&str>> {
        self.changes.get(&field).map(|v| v.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeadField, Option<&str>)> {
        self.changes.iter().map(|(f, v)| (*f, v.as_deref()))
    }

    /// Builds a patch from canonical field names, rejecting unknown names.
    pub fn from_fields(fields: &Fields) -> Result<Self> {
        let mut patch = LeadPatch::new();
        for (name, value) in fields {
            let field: LeadField = name.parse()?;
            patch.insert(field, value_to_text(value));
        }
        Ok(patch)
    }
}

/// Conjunctive exact-match filter over content fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadFilter {
    conditions: Vec<(LeadField, Option<String>)>,
}

impl LeadFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires `field = value`.
    pub fn eq(mut self, field: LeadField, value: impl Into<String>) -> Self {
        self.conditions.push((field, Some(value.into())));
        self
    }

    /// Requires `field` to be empty.
    pub fn is_null(mut self, field: LeadField) -> Self {
        self.conditions.push((field, None));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[(LeadField, Option<String>)] {
        &self.conditions
    }
}

/// Input for creating a lead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLead {
    /// Explicit local id; assigned by the store when absent.
    pub id: Option<i64>,
    /// Only meaningful for leads created by a pull.
    pub remote_id: Option<String>,
    pub fields: LeadPatch,
}

impl NewLead {
    pub fn new(fields: LeadPatch) -> Self {
        NewLead {
            id: None,
            remote_id: None,
            fields,
        }
    }

    /// Shorthand for a freshly scraped lead with a name and company.
    pub fn named(full_name: &str, company: &str) -> Self {
        NewLead::new(
            LeadPatch::new()
                .set(LeadField::FullName, full_name)
                .set(LeadField::Company, company),
        )
    }

    pub fn with_field(mut self, field: LeadField, value: impl Into<String>) -> Self {
        self.fields.insert(field, Some(value.into()));
        self
    }

    pub fn with_remote_id(mut self, remote_id: impl Into<String>) -> Self {
        self.remote_id = Some(remote_id.into());
        self
    }
}

/// Converts a remote JSON value into the text stored locally.
///
/// Scalars keep their JSON text, arrays of scalars are joined with ", "
/// (multi-select and linked-record cells), objects are kept as compact JSON.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(value_to_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(_) => Some(value.to_string()),
    }
}

/// Trims an email; blank becomes `None`.
pub fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

#[cfg(test)]
#[path = "lead_tests.rs"]
mod tests;
