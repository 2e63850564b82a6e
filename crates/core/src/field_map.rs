// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Translation between canonical lead field names and remote column names.
//!
//! The remote table's column names are chosen by whoever owns that schema
//! (spaces, capitalisation, renamed columns). This module is the only place
//! they appear. Mapping is pure and total: unmapped fields are dropped on the
//! way out and preserved verbatim on the way in.

use crate::lead::{Fields, LeadField, LeadRecord};

/// Mapping used by the outreach pipeline's lead table.
pub const AIRTABLE_LEADS: &[(LeadField, Option<&str>)] = &[
    (LeadField::FullName, Some("Full Name")),
    (LeadField::Company, Some("Company")),
    (LeadField::Email, Some("Email")),
    (LeadField::Title, Some("Title")),
    (LeadField::LinkedinUrl, Some("LinkedIn URL")),
    (LeadField::Website, Some("Company Website")),
    (LeadField::Status, Some("Status")),
    (LeadField::Message, Some("Message")),
    (LeadField::CompanyDescription, Some("Company Description")),
    (LeadField::ContactedAt, Some("Date Contacted")),
    (LeadField::Source, None),
];

/// Static bidirectional field mapping.
///
/// A canonical field that is missing from the table, or mapped to `None`,
/// is local only.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(LeadField, Option<&'static str>)],
}

impl Default for FieldMap {
    fn default() -> Self {
        FieldMap::new(AIRTABLE_LEADS)
    }
}

impl FieldMap {
    pub const fn new(entries: &'static [(LeadField, Option<&'static str>)]) -> Self {
        FieldMap { entries }
    }

    /// Remote column for a canonical field, if it has one.
    pub fn remote_name(&self, field: LeadField) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, remote)| *remote)
    }

    /// Canonical field for a remote column, if it maps to one.
    pub fn canonical_field(&self, remote: &str) -> Option<LeadField> {
        self.entries
            .iter()
            .find(|(_, r)| *r == Some(remote))
            .map(|(f, _)| *f)
    }

    /// Canonical fields that exist remotely.
    pub fn mapped_fields(&self) -> impl Iterator<Item = LeadField> + '_ {
        self.entries
            .iter()
            .filter(|(_, remote)| remote.is_some())
            .map(|(f, _)| *f)
    }

    /// Renames canonical keys to remote columns.
    ///
    /// Keys with no remote column (or that are not canonical names) are
    /// omitted entirely rather than sent as `null`.
    pub fn to_remote(&self, canonical: &Fields) -> Fields {
        canonical
            .iter()
            .filter_map(|(name, value)| {
                let field: LeadField = name.parse().ok()?;
                let remote = self.remote_name(field)?;
                Some((remote.to_string(), value.clone()))
            })
            .collect()
    }

    /// Renames remote columns to canonical keys.
    ///
    /// Columns with no canonical counterpart keep their remote name.
    pub fn from_remote(&self, remote: &Fields) -> Fields {
        remote
            .iter()
            .map(|(name, value)| {
                let key = match self.canonical_field(name) {
                    Some(field) => field.as_str().to_string(),
                    None => name.clone(),
                };
                (key, value.clone())
            })
            .collect()
    }

    /// Remote payload for a whole record.
    pub fn record_to_remote(&self, record: &LeadRecord) -> Fields {
        self.to_remote(&record.content_fields())
    }
}

#[cfg(test)]
#[path = "field_map_tests.rs"]
mod tests;
