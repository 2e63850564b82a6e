// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::clock::ManualClock;
use crate::lead::status;
use chrono::{Duration, TimeZone};

fn lead(name: &str, email: &str) -> NewLead {
    NewLead::named(name, "Acme").with_field(LeadField::Email, email)
}

fn clocked_db() -> (Database, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    ));
    let db = Database::open_in_memory().unwrap().with_clock(clock.clone());
    (db, clock)
}

#[test]
fn create_assigns_id_and_marks_local_dirty() {
    let db = Database::open_in_memory().unwrap();

    let first = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();
    let second = db.create(&lead("Grace", "grace@example.com"), WriteOrigin::Local).unwrap();

    assert!(second.id > first.id);
    assert!(first.dirty);
    assert_eq!(first.status, status::NEW);
    assert!(first.remote_id.is_none());
    assert!(first.last_synced_at.is_none());
}

#[test]
fn create_with_explicit_id() {
    let db = Database::open_in_memory().unwrap();
    let mut new = lead("Ada", "ada@example.com");
    new.id = Some(500);

    let created = db.create(&new, WriteOrigin::Local).unwrap();
    assert_eq!(created.id, 500);
    assert_eq!(db.get(500).unwrap().full_name.as_deref(), Some("Ada"));
}

#[test]
fn sync_create_is_clean_and_stamped() {
    let (db, clock) = clocked_db();
    let new = lead("Ada", "ada@example.com").with_remote_id("rec001");

    let created = db.create(&new, WriteOrigin::Sync).unwrap();
    assert!(!created.dirty);
    assert_eq!(created.remote_id.as_deref(), Some("rec001"));
    assert_eq!(created.last_synced_at, Some(clock.now()));
}

#[test]
fn create_rejects_duplicate_email() {
    let db = Database::open_in_memory().unwrap();
    let first = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();

    let err = db
        .create(&lead("Ada Again", "ADA@example.com "), WriteOrigin::Local)
        .unwrap_err();

    assert!(matches!(
        err,
        Error::DuplicateEmail { ref email, existing_id }
            if email == "ADA@example.com" && existing_id == first.id
    ));
    assert_eq!(db.count().unwrap(), 1);
}

#[test]
fn leads_without_email_do_not_collide() {
    let db = Database::open_in_memory().unwrap();
    db.create(&NewLead::named("Ada", "Acme"), WriteOrigin::Local).unwrap();
    db.create(&NewLead::named("Grace", "Acme"), WriteOrigin::Local).unwrap();
    db.create(&lead("Blank", "  "), WriteOrigin::Local).unwrap();

    assert_eq!(db.count().unwrap(), 3);
}

#[test]
fn get_missing_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(matches!(db.get(99), Err(Error::NotFound(99))));
    assert!(!db.exists(99).unwrap());
}

#[test]
fn local_update_merges_and_marks_dirty() {
    let db = Database::open_in_memory().unwrap();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Sync).unwrap();
    assert!(!created.dirty);

    let patch = LeadPatch::new()
        .set(LeadField::Status, status::ENRICHED)
        .set(LeadField::Title, "Countess");
    let updated = db.update(created.id, &patch, WriteOrigin::Local).unwrap();

    assert!(updated.dirty);
    assert_eq!(updated.status, status::ENRICHED);
    assert_eq!(updated.title.as_deref(), Some("Countess"));
    assert_eq!(updated.full_name.as_deref(), Some("Ada"));
    assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn sync_update_clears_dirty_and_error() {
    let (db, clock) = clocked_db();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();
    db.mark_sync_failed(created.id, "transient: timeout", clock.now()).unwrap();

    clock.advance(Duration::minutes(10));
    let patch = LeadPatch::new().set(LeadField::Company, "Engines Ltd");
    let updated = db.update(created.id, &patch, WriteOrigin::Sync).unwrap();

    assert!(!updated.dirty);
    assert!(updated.sync_error.is_none());
    assert_eq!(updated.last_synced_at, Some(clock.now()));
    assert_eq!(updated.company.as_deref(), Some("Engines Ltd"));
}

#[test]
fn update_missing_is_not_found() {
    let db = Database::open_in_memory().unwrap();
    let patch = LeadPatch::new().set(LeadField::Title, "CTO");
    assert!(matches!(
        db.update(7, &patch, WriteOrigin::Local),
        Err(Error::NotFound(7))
    ));
}

#[test]
fn update_rejects_email_taken_by_another_lead() {
    let db = Database::open_in_memory().unwrap();
    let ada = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();
    let grace = db.create(&lead("Grace", "grace@example.com"), WriteOrigin::Local).unwrap();

    let patch = LeadPatch::new().set(LeadField::Email, "ada@example.com");
    let err = db.update(grace.id, &patch, WriteOrigin::Local).unwrap_err();
    assert!(matches!(err, Error::DuplicateEmail { existing_id, .. } if existing_id == ada.id));

    // Re-setting a lead's own email is fine.
    let own = LeadPatch::new().set(LeadField::Email, "Ada@Example.com");
    db.update(ada.id, &own, WriteOrigin::Local).unwrap();
}

#[test]
fn empty_update_does_not_mark_dirty() {
    let db = Database::open_in_memory().unwrap();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Sync).unwrap();

    let same = db.update(created.id, &LeadPatch::new(), WriteOrigin::Local).unwrap();
    assert!(!same.dirty);
}

#[test]
fn clearing_status_falls_back_to_new() {
    let db = Database::open_in_memory().unwrap();
    let created = db
        .create(
            &lead("Ada", "ada@example.com").with_field(LeadField::Status, status::CONTACTED),
            WriteOrigin::Local,
        )
        .unwrap();

    let patch = LeadPatch::new().clear(LeadField::Status);
    let updated = db.update(created.id, &patch, WriteOrigin::Local).unwrap();
    assert_eq!(updated.status, status::NEW);
}

#[test]
fn query_is_conjunctive() {
    let db = Database::open_in_memory().unwrap();
    db.create(
        &lead("Ada", "ada@example.com").with_field(LeadField::Status, status::ENRICHED),
        WriteOrigin::Local,
    )
    .unwrap();
    db.create(
        &NewLead::named("Grace", "Navy").with_field(LeadField::Status, status::ENRICHED),
        WriteOrigin::Local,
    )
    .unwrap();
    db.create(&lead("Alan", "alan@example.com"), WriteOrigin::Local).unwrap();

    let enriched = db
        .query(&LeadFilter::new().eq(LeadField::Status, status::ENRICHED))
        .unwrap();
    assert_eq!(enriched.len(), 2);

    let enriched_at_acme = db
        .query(
            &LeadFilter::new()
                .eq(LeadField::Status, status::ENRICHED)
                .eq(LeadField::Company, "Acme"),
        )
        .unwrap();
    assert_eq!(enriched_at_acme.len(), 1);
    assert_eq!(enriched_at_acme[0].full_name.as_deref(), Some("Ada"));

    let no_email = db.query(&LeadFilter::new().is_null(LeadField::Email)).unwrap();
    assert_eq!(no_email.len(), 1);
    assert_eq!(no_email[0].full_name.as_deref(), Some("Grace"));
}

#[test]
fn list_dirty_is_ordered_by_id() {
    let db = Database::open_in_memory().unwrap();
    let mut third = lead("Third", "c@example.com");
    third.id = Some(30);
    let mut first = lead("First", "a@example.com");
    first.id = Some(10);
    db.create(&third, WriteOrigin::Local).unwrap();
    db.create(&first, WriteOrigin::Local).unwrap();
    db.create(&lead("Clean", "clean@example.com"), WriteOrigin::Sync).unwrap();

    let ids: Vec<i64> = db.list_dirty().unwrap().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![10, 30]);
    assert_eq!(db.dirty_count().unwrap(), 2);
}

#[test]
fn mark_synced_sets_remote_id_and_clears_dirty() {
    let (db, clock) = clocked_db();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();
    db.mark_sync_failed(created.id, "transient: 503", clock.now()).unwrap();

    db.mark_synced(created.id, "recABC", clock.now()).unwrap();
    let synced = db.get(created.id).unwrap();

    assert!(!synced.dirty);
    assert_eq!(synced.remote_id.as_deref(), Some("recABC"));
    assert!(synced.sync_error.is_none());
    assert_eq!(synced.last_synced_at, Some(clock.now()));
    assert_eq!(db.get_by_remote_id("recABC").unwrap().unwrap().id, created.id);
}

#[test]
fn mark_sync_failed_keeps_dirty() {
    let (db, clock) = clocked_db();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();

    db.mark_sync_failed(created.id, "rejected: 422 INVALID_VALUE", clock.now())
        .unwrap();
    let failed = db.get(created.id).unwrap();

    assert!(failed.dirty);
    assert_eq!(failed.sync_error.as_deref(), Some("rejected: 422 INVALID_VALUE"));
    assert_eq!(failed.last_sync_attempt_at, Some(clock.now()));
    assert!(failed.last_synced_at.is_none());
}

#[test]
fn abandon_sync_removes_from_dirty_list() {
    let db = Database::open_in_memory().unwrap();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();

    db.abandon_sync(created.id).unwrap();
    assert!(db.list_dirty().unwrap().is_empty());
    assert!(matches!(db.abandon_sync(404), Err(Error::NotFound(404))));
}

#[test]
fn find_by_email_ignores_case_and_whitespace() {
    let db = Database::open_in_memory().unwrap();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();

    let found = db.find_by_email(" ADA@EXAMPLE.COM ").unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert!(db.find_by_email("").unwrap().is_none());
    assert!(db.find_by_email("nobody@example.com").unwrap().is_none());
}

#[test]
fn delete_removes_lead() {
    let db = Database::open_in_memory().unwrap();
    let created = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();

    db.delete(created.id).unwrap();
    assert!(!db.exists(created.id).unwrap());
    assert!(matches!(db.delete(created.id), Err(Error::NotFound(_))));
}

#[test]
fn status_counts_group_by_status() {
    let db = Database::open_in_memory().unwrap();
    db.create(&lead("Ada", "a@example.com"), WriteOrigin::Local).unwrap();
    db.create(&lead("Grace", "g@example.com"), WriteOrigin::Local).unwrap();
    db.create(
        &lead("Alan", "t@example.com").with_field(LeadField::Status, status::CONTACTED),
        WriteOrigin::Local,
    )
    .unwrap();

    let counts = db.status_counts().unwrap();
    assert_eq!(counts.get("new"), Some(&2));
    assert_eq!(counts.get("contacted"), Some(&1));
}

#[test]
fn last_global_sync_round_trips() {
    let (db, clock) = clocked_db();
    assert!(db.last_global_sync_at().unwrap().is_none());

    db.set_last_global_sync_at(clock.now()).unwrap();
    assert_eq!(db.last_global_sync_at().unwrap(), Some(clock.now()));

    clock.advance(Duration::hours(1));
    db.set_last_global_sync_at(clock.now()).unwrap();
    assert_eq!(db.last_global_sync_at().unwrap(), Some(clock.now()));
}

#[test]
fn sync_log_returns_newest_first() {
    let db = Database::open_in_memory().unwrap();
    db.record_sync_outcome(Some(1), None, SyncDirection::Push, SyncOutcome::Failed, Some("timeout"))
        .unwrap();
    db.record_sync_outcome(Some(1), Some("rec1"), SyncDirection::Push, SyncOutcome::Created, None)
        .unwrap();
    db.record_sync_outcome(None, Some("rec2"), SyncDirection::Pull, SyncOutcome::Failed, None)
        .unwrap();

    let entries = db.recent_sync_log(2).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].direction, SyncDirection::Pull);
    assert_eq!(entries[0].remote_id.as_deref(), Some("rec2"));
    assert_eq!(entries[1].outcome, SyncOutcome::Created);
}

#[test]
fn open_on_disk_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("leads.db");

    let id = {
        let db = Database::open(&path).unwrap();
        db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap().id
    };

    let db = Database::open(&path).unwrap();
    assert_eq!(db.get(id).unwrap().email.as_deref(), Some("ada@example.com"));
}

#[test]
fn dedup_emails_keeps_most_recent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    // A database written before sync columns and email uniqueness existed.
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE leads (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 full_name TEXT,
                 company TEXT,
                 email TEXT,
                 status TEXT NOT NULL DEFAULT 'new',
                 created_at TEXT NOT NULL,
                 updated_at TEXT NOT NULL
             );
             INSERT INTO leads (full_name, email, created_at, updated_at) VALUES
                 ('Ada old', 'ada@example.com', '2026-01-01T00:00:00.000000Z', '2026-01-01T00:00:00.000000Z'),
                 ('Ada new', 'ADA@example.com', '2026-02-01T00:00:00.000000Z', '2026-02-01T00:00:00.000000Z'),
                 ('Grace', 'grace@example.com', '2026-01-15T00:00:00.000000Z', '2026-01-15T00:00:00.000000Z'),
                 ('No email', NULL, '2026-01-15T00:00:00.000000Z', '2026-01-15T00:00:00.000000Z'),
                 ('No email 2', NULL, '2026-01-16T00:00:00.000000Z', '2026-01-16T00:00:00.000000Z');",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    let names: Vec<String> = db
        .all()
        .unwrap()
        .into_iter()
        .filter_map(|l| l.full_name)
        .collect();
    assert_eq!(names, vec!["Ada new", "Grace", "No email", "No email 2"]);

    // Migrated rows never reached the remote, so they are queued for push.
    assert_eq!(db.dirty_count().unwrap(), 4);

    // The unique index is in place now.
    let err = db.create(&lead("Ada 3", "ada@example.com"), WriteOrigin::Local);
    assert!(matches!(err, Err(Error::DuplicateEmail { .. })));
}

/// Writes a pre-sync leads table holding the given emails.
fn legacy_db(path: &std::path::Path, emails: &[&str]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE leads (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             full_name TEXT,
             email TEXT,
             status TEXT NOT NULL DEFAULT 'new',
             created_at TEXT NOT NULL,
             updated_at TEXT NOT NULL
         );",
    )
    .unwrap();
    for (i, email) in emails.iter().enumerate() {
        conn.execute(
            "INSERT INTO leads (full_name, email, created_at, updated_at)
             VALUES (?1, ?2, '2026-01-01T00:00:00.000000Z', '2026-01-01T00:00:00.000000Z')",
            params![format!("Lead {}", i + 1), email],
        )
        .unwrap();
    }
}

#[test]
fn open_turns_blank_legacy_emails_into_null() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    legacy_db(&path, &[" ", "  ", ""]);

    let db = Database::open(&path).unwrap();
    let leads = db.all().unwrap();
    assert_eq!(leads.len(), 3);
    assert!(leads.iter().all(|l| l.email.is_none()));

    // Reopening with the index in place still works.
    drop(db);
    Database::open(&path).unwrap();
}

#[test]
fn open_trims_legacy_emails_so_uniqueness_holds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    legacy_db(&path, &[" ada@example.com "]);

    let db = Database::open(&path).unwrap();
    assert_eq!(db.get(1).unwrap().email.as_deref(), Some("ada@example.com"));

    let err = db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local);
    assert!(matches!(err, Err(Error::DuplicateEmail { existing_id: 1, .. })));
    assert_eq!(db.find_by_email("ADA@example.com").unwrap().unwrap().id, 1);
}

#[test]
fn open_dedups_emails_that_collide_once_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    legacy_db(&path, &["ada@example.com", " ada@example.com"]);

    let db = Database::open(&path).unwrap();
    assert_eq!(db.count().unwrap(), 1);
    assert_eq!(db.all().unwrap()[0].id, 2);
}

#[test]
fn dedup_emails_is_a_no_op_on_clean_store() {
    let db = Database::open_in_memory().unwrap();
    db.create(&lead("Ada", "ada@example.com"), WriteOrigin::Local).unwrap();
    assert!(db.dedup_emails().unwrap().is_empty());
    assert_eq!(db.count().unwrap(), 1);
}
