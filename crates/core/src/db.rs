// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed lead store.
//!
//! The [`Database`] struct provides all data access for leads, their sync
//! metadata, the global sync marker and the sync log. Every mutation runs in
//! its own short transaction and is committed before the call returns.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::error::{Error, Result};
use crate::lead::{status, LeadField, LeadFilter, LeadPatch, LeadRecord, NewLead, WriteOrigin};
use crate::sync_log::{SyncDirection, SyncLogEntry, SyncOutcome};

/// SQL schema for the lead cache.
pub const SCHEMA: &str = r#"
-- One row per lead, content columns plus sync metadata
CREATE TABLE IF NOT EXISTS leads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    remote_id TEXT,
    full_name TEXT,
    company TEXT,
    email TEXT,
    title TEXT,
    linkedin_url TEXT,
    website TEXT,
    status TEXT NOT NULL DEFAULT 'new',
    message TEXT,
    company_description TEXT,
    contacted_at TEXT,
    source TEXT,
    dirty INTEGER NOT NULL DEFAULT 1,
    last_synced_at TEXT,
    last_sync_attempt_at TEXT,
    sync_error TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Process-wide sync markers (last_global_sync_at)
CREATE TABLE IF NOT EXISTS sync_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Per-record sync outcomes
CREATE TABLE IF NOT EXISTS sync_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    lead_id INTEGER,
    remote_id TEXT,
    direction TEXT NOT NULL,
    outcome TEXT NOT NULL,
    detail TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sync_log_lead ON sync_log(lead_id);
"#;

/// Lead indexes, created after migrations have added missing columns and
/// cleaned up legacy rows.
const LEAD_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status);
CREATE INDEX IF NOT EXISTS idx_leads_dirty ON leads(dirty);
CREATE UNIQUE INDEX IF NOT EXISTS idx_leads_remote_id
    ON leads(remote_id) WHERE remote_id IS NOT NULL;
CREATE UNIQUE INDEX IF NOT EXISTS idx_leads_email
    ON leads(lower(email)) WHERE email IS NOT NULL AND email != '';
"#;

const META_LAST_GLOBAL_SYNC: &str = "last_global_sync_at";

const LEAD_COLUMNS: &str = "id, remote_id, full_name, company, email, title, linkedin_url,
     website, status, message, company_description, contacted_at, source, dirty,
     last_synced_at, last_sync_attempt_at, sync_error, created_at, updated_at";

/// Formats a timestamp for storage. Fixed width so that text order is time order.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.map(|v| parse_timestamp(&v, column)).transpose()
}

fn row_to_lead(row: &Row<'_>) -> std::result::Result<LeadRecord, rusqlite::Error> {
    let created_str: String = row.get(17)?;
    let updated_str: String = row.get(18)?;
    Ok(LeadRecord {
        id: row.get(0)?,
        remote_id: row.get(1)?,
        full_name: row.get(2)?,
        company: row.get(3)?,
        email: row.get(4)?,
        title: row.get(5)?,
        linkedin_url: row.get(6)?,
        website: row.get(7)?,
        status: row.get(8)?,
        message: row.get(9)?,
        company_description: row.get(10)?,
        contacted_at: row.get(11)?,
        source: row.get(12)?,
        dirty: row.get(13)?,
        last_synced_at: parse_timestamp_opt(row.get(14)?, "last_synced_at")?,
        last_sync_attempt_at: parse_timestamp_opt(row.get(15)?, "last_sync_attempt_at")?,
        sync_error: row.get(16)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

/// Value written for a patched field. Status cannot be empty.
fn column_value(field: LeadField, value: Option<&str>) -> SqlValue {
    match (field, value) {
        (_, Some(v)) => SqlValue::Text(v.to_string()),
        (LeadField::Status, None) => SqlValue::Text(status::NEW.to_string()),
        (_, None) => SqlValue::Null,
    }
}

/// Run schema creation and all migrations on a database connection.
///
/// Older lead databases may predate the sync columns, and may hold duplicate
/// emails written before uniqueness was enforced. Both are repaired here
/// before the unique indexes are built.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    migrate_add_columns(conn)?;
    migrate_normalize_emails(conn)?;
    migrate_dedup_emails(conn)?;
    conn.execute_batch(LEAD_INDEXES)?;
    Ok(())
}

/// Migration: Add columns missing from databases created by older versions.
fn migrate_add_columns(conn: &Connection) -> Result<()> {
    let columns = [
        ("remote_id", "TEXT"),
        ("full_name", "TEXT"),
        ("company", "TEXT"),
        ("email", "TEXT"),
        ("title", "TEXT"),
        ("linkedin_url", "TEXT"),
        ("website", "TEXT"),
        ("status", "TEXT NOT NULL DEFAULT 'new'"),
        ("message", "TEXT"),
        ("company_description", "TEXT"),
        ("contacted_at", "TEXT"),
        ("source", "TEXT"),
        ("dirty", "INTEGER NOT NULL DEFAULT 1"),
        ("last_synced_at", "TEXT"),
        ("last_sync_attempt_at", "TEXT"),
        ("sync_error", "TEXT"),
    ];

    for (column, decl) in columns {
        let has_column: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM pragma_table_info('leads') WHERE name = ?1",
                [column],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !has_column {
            let sql = format!("ALTER TABLE leads ADD COLUMN {column} {decl}");
            conn.execute(&sql, [])?;
        }
    }

    Ok(())
}

/// Migration: Trim stored emails and turn blank ones into NULL.
///
/// Older versions stored emails as typed. The email index is dropped first
/// because trimming can make rows collide; dedup and index creation follow.
fn migrate_normalize_emails(conn: &Connection) -> Result<()> {
    let unnormalized: i64 = conn.query_row(
        "SELECT COUNT(*) FROM leads
         WHERE email IS NOT NULL AND (email = '' OR email != trim(email))",
        [],
        |row| row.get(0),
    )?;

    if unnormalized > 0 {
        conn.execute_batch(
            "DROP INDEX IF EXISTS idx_leads_email;
             UPDATE leads SET email = NULLIF(trim(email), '') WHERE email IS NOT NULL;",
        )?;
        tracing::info!("normalized {} lead emails", unnormalized);
    }
    Ok(())
}

/// Migration: Remove duplicate emails so the unique index can be built.
///
/// Only runs while the index does not exist yet.
fn migrate_dedup_emails(conn: &Connection) -> Result<()> {
    let has_index: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master
             WHERE type = 'index' AND name = 'idx_leads_email'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);

    if !has_index {
        let removed = dedup_emails_in(conn)?;
        if !removed.is_empty() {
            tracing::info!("removed {} leads with duplicate emails", removed.len());
        }
    }
    Ok(())
}

/// Deletes every lead whose email also belongs to a more recently created
/// lead. Returns the removed ids in ascending order.
fn dedup_emails_in(conn: &Connection) -> Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT l.id FROM leads l
         WHERE l.email IS NOT NULL AND trim(l.email) != ''
           AND EXISTS (
               SELECT 1 FROM leads o
               WHERE o.id != l.id
                 AND lower(trim(o.email)) = lower(trim(l.email))
                 AND (o.created_at > l.created_at
                      OR (o.created_at = l.created_at AND o.id > l.id))
           )
         ORDER BY l.id",
    )?;

    let ids = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<i64>, _>>()?;

    for id in &ids {
        conn.execute("DELETE FROM leads WHERE id = ?1", params![id])?;
    }
    Ok(ids)
}

fn get_in(conn: &Connection, id: i64) -> Result<LeadRecord> {
    let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1");
    conn.query_row(&sql, params![id], row_to_lead)
        .optional()?
        .ok_or(Error::NotFound(id))
}

/// Returns the id of the lead holding `email`, ignoring case.
fn email_owner(conn: &Connection, email: &str) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM leads WHERE lower(email) = lower(?1)",
            params![email],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn ensure_email_free(conn: &Connection, email: &str, owner: Option<i64>) -> Result<()> {
    match email_owner(conn, email)? {
        Some(existing_id) if Some(existing_id) != owner => Err(Error::DuplicateEmail {
            email: email.to_string(),
            existing_id,
        }),
        _ => Ok(()),
    }
}

/// SQLite database connection with lead store operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
    clock: Arc<dyn Clock>,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database {
            conn,
            clock: Arc::new(SystemClock),
        };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database {
            conn,
            clock: Arc::new(SystemClock),
        };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Replace the clock used for every timestamp this store writes.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Create a new lead.
    ///
    /// Local creates are dirty (never pushed). Sync creates are clean and
    /// stamped as synced.
    pub fn create(&self, lead: &NewLead, origin: WriteOrigin) -> Result<LeadRecord> {
        let tx = self.conn.unchecked_transaction()?;

        if let Some(Some(email)) = lead.fields.get(LeadField::Email) {
            ensure_email_free(&tx, email, None)?;
        }

        let now = format_timestamp(self.now());
        let mut columns: Vec<&str> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        if let Some(id) = lead.id {
            columns.push("id");
            values.push(SqlValue::Integer(id));
        }
        columns.push("remote_id");
        values.push(
            lead.remote_id
                .clone()
                .map(SqlValue::Text)
                .unwrap_or(SqlValue::Null),
        );

        for field in LeadField::ALL {
            let value = lead.fields.get(field).flatten();
            columns.push(field.as_str());
            values.push(column_value(field, value));
        }

        let synced = origin == WriteOrigin::Sync;
        columns.push("dirty");
        values.push(SqlValue::Integer(i64::from(!synced)));
        columns.push("last_synced_at");
        values.push(if synced {
            SqlValue::Text(now.clone())
        } else {
            SqlValue::Null
        });
        columns.push("created_at");
        values.push(SqlValue::Text(now.clone()));
        columns.push("updated_at");
        values.push(SqlValue::Text(now));

        let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO leads ({}) VALUES ({})",
            columns.join(", "),
            placeholders.join(", ")
        );
        tx.execute(&sql, params_from_iter(values))?;

        let id = lead.id.unwrap_or_else(|| tx.last_insert_rowid());
        let record = get_in(&tx, id)?;
        tx.commit()?;
        Ok(record)
    }

    /// Get a lead by ID.
    pub fn get(&self, id: i64) -> Result<LeadRecord> {
        get_in(&self.conn, id)
    }

    /// Check if a lead exists.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM leads WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get a lead by its remote record id.
    pub fn get_by_remote_id(&self, remote_id: &str) -> Result<Option<LeadRecord>> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE remote_id = ?1");
        let lead = self
            .conn
            .query_row(&sql, params![remote_id], row_to_lead)
            .optional()?;
        Ok(lead)
    }

    /// Find the lead holding an email, ignoring case and surrounding whitespace.
    pub fn find_by_email(&self, email: &str) -> Result<Option<LeadRecord>> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(None);
        }
        match email_owner(&self.conn, email)? {
            Some(id) => Ok(Some(self.get(id)?)),
            None => Ok(None),
        }
    }

    /// Merge a patch into a lead.
    ///
    /// Local updates mark the lead dirty. Sync updates clear dirty, stamp
    /// `last_synced_at` and clear any previous sync error.
    pub fn update(&self, id: i64, patch: &LeadPatch, origin: WriteOrigin) -> Result<LeadRecord> {
        let tx = self.conn.unchecked_transaction()?;
        let current = get_in(&tx, id)?;

        if patch.is_empty() {
            return Ok(current);
        }

        if let Some(Some(email)) = patch.get(LeadField::Email) {
            ensure_email_free(&tx, email, Some(id))?;
        }

        let now = format_timestamp(self.now());
        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        for (field, value) in patch.iter() {
            values.push(column_value(field, value));
            sets.push(format!("{} = ?{}", field.as_str(), values.len()));
        }

        values.push(SqlValue::Text(now.clone()));
        sets.push(format!("updated_at = ?{}", values.len()));

        match origin {
            WriteOrigin::Local => sets.push("dirty = 1".to_string()),
            WriteOrigin::Sync => {
                values.push(SqlValue::Text(now));
                sets.push(format!("last_synced_at = ?{}", values.len()));
                sets.push("dirty = 0".to_string());
                sets.push("sync_error = NULL".to_string());
            }
        }

        values.push(SqlValue::Integer(id));
        let sql = format!(
            "UPDATE leads SET {} WHERE id = ?{}",
            sets.join(", "),
            values.len()
        );
        tx.execute(&sql, params_from_iter(values))?;

        let record = get_in(&tx, id)?;
        tx.commit()?;
        Ok(record)
    }

    /// List leads matching every condition of the filter, ordered by id.
    pub fn query(&self, filter: &LeadFilter) -> Result<Vec<LeadRecord>> {
        let mut sql = format!("SELECT {LEAD_COLUMNS} FROM leads");
        let mut conditions = Vec::new();
        let mut values: Vec<SqlValue> = Vec::new();

        for (field, value) in filter.conditions() {
            match value {
                Some(v) => {
                    values.push(SqlValue::Text(v.clone()));
                    conditions.push(format!("{} = ?{}", field.as_str(), values.len()));
                }
                None => conditions.push(format!("{} IS NULL", field.as_str())),
            }
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let leads = stmt
            .query_map(params_from_iter(values), row_to_lead)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(leads)
    }

    /// Get all leads, ordered by id.
    pub fn all(&self) -> Result<Vec<LeadRecord>> {
        self.query(&LeadFilter::new())
    }

    /// Leads with unpushed local changes, ordered by id for deterministic batching.
    pub fn list_dirty(&self) -> Result<Vec<LeadRecord>> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE dirty = 1 ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let leads = stmt
            .query_map([], row_to_lead)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(leads)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM leads", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    pub fn dirty_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM leads WHERE dirty = 1", [], |row| {
                    row.get(0)
                })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Number of leads per status.
    pub fn status_counts(&self) -> Result<BTreeMap<String, usize>> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM leads GROUP BY status")?;
        let counts = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get(0)?, usize::try_from(count).unwrap_or(0)))
            })?
            .collect::<std::result::Result<BTreeMap<String, usize>, _>>()?;
        Ok(counts)
    }

    /// Delete a lead. Only cleanup paths call this.
    pub fn delete(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM leads WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    /// Remove leads sharing an email, keeping the most recently created one.
    pub fn dedup_emails(&self) -> Result<Vec<i64>> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = dedup_emails_in(&tx)?;
        tx.commit()?;
        Ok(removed)
    }

    /// Record a successful push: store the remote id and clear dirty.
    pub fn mark_synced(&self, id: i64, remote_id: &str, at: DateTime<Utc>) -> Result<()> {
        let at = format_timestamp(at);
        let affected = self.conn.execute(
            "UPDATE leads SET remote_id = ?1, dirty = 0, last_synced_at = ?2,
                 last_sync_attempt_at = ?2, sync_error = NULL
             WHERE id = ?3",
            params![remote_id, at, id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    /// Record a failed push. The lead stays dirty.
    pub fn mark_sync_failed(&self, id: i64, error: &str, at: DateTime<Utc>) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE leads SET sync_error = ?1, last_sync_attempt_at = ?2 WHERE id = ?3",
            params![error, format_timestamp(at), id],
        )?;
        if affected == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    /// Drop pending local changes from the push queue without pushing them.
    ///
    /// The content stays as it is locally; the last sync error is kept.
    pub fn abandon_sync(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("UPDATE leads SET dirty = 0 WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM sync_meta WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sync_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// When the last complete pull finished.
    pub fn last_global_sync_at(&self) -> Result<Option<DateTime<Utc>>> {
        match self.get_meta(META_LAST_GLOBAL_SYNC)? {
            Some(value) => Ok(Some(parse_timestamp(&value, META_LAST_GLOBAL_SYNC)?)),
            None => Ok(None),
        }
    }

    pub fn set_last_global_sync_at(&self, at: DateTime<Utc>) -> Result<()> {
        self.set_meta(META_LAST_GLOBAL_SYNC, &format_timestamp(at))
    }

    /// Append an entry to the sync log.
    pub fn record_sync_outcome(
        &self,
        lead_id: Option<i64>,
        remote_id: Option<&str>,
        direction: SyncDirection,
        outcome: SyncOutcome,
        detail: Option<&str>,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sync_log (lead_id, remote_id, direction, outcome, detail, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                lead_id,
                remote_id,
                direction.as_str(),
                outcome.as_str(),
                detail,
                format_timestamp(self.now()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent sync log entries, newest first.
    pub fn recent_sync_log(&self, limit: usize) -> Result<Vec<SyncLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lead_id, remote_id, direction, outcome, detail, created_at
             FROM sync_log ORDER BY id DESC LIMIT ?1",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map(params![limit_i64], |row| {
                let direction_str: String = row.get(3)?;
                let outcome_str: String = row.get(4)?;
                let created_str: String = row.get(6)?;
                Ok(SyncLogEntry {
                    id: row.get(0)?,
                    lead_id: row.get(1)?,
                    remote_id: row.get(2)?,
                    direction: parse_db(&direction_str, "direction")?,
                    outcome: parse_db(&outcome_str, "outcome")?,
                    detail: row.get(5)?,
                    created_at: parse_timestamp(&created_str, "created_at")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
