// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory remote table for sync tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use lead_core::Fields;
use serde_json::Value;

use super::remote::{RemoteError, RemotePage, RemoteRecord, RemoteResult, RemoteTable};

/// A call the manager made against the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List(Option<String>),
    Create(Fields),
    Update(String, Fields),
}

#[derive(Default)]
struct MockState {
    records: BTreeMap<String, Fields>,
    next_id: u32,
    calls: Vec<MockCall>,
    writes: usize,
    write_failures: HashMap<usize, RemoteError>,
    list_failure: Option<RemoteError>,
    preflight_failure: Option<RemoteError>,
}

/// Remote table that keeps records in a map, ordered by id.
pub struct MockRemote {
    state: Mutex<MockState>,
    page_size: usize,
}

impl Default for MockRemote {
    fn default() -> Self {
        MockRemote::new()
    }
}

impl MockRemote {
    pub fn new() -> Self {
        MockRemote {
            state: Mutex::new(MockState::default()),
            page_size: 100,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Seed a remote record (remote column names).
    pub fn insert(&self, id: &str, fields: Value) {
        let fields = fields.as_object().cloned().unwrap_or_default();
        self.lock().records.insert(id.to_string(), fields);
    }

    pub fn record(&self, id: &str) -> Option<Fields> {
        self.lock().records.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Number of create and update calls so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Fail the `n`th write (1-based, counted across creates and updates).
    pub fn fail_write(&self, n: usize, error: RemoteError) {
        self.lock().write_failures.insert(n, error);
    }

    /// Fail every list request.
    pub fn fail_list(&self, error: RemoteError) {
        self.lock().list_failure = Some(error);
    }

    pub fn fail_preflight(&self, error: RemoteError) {
        self.lock().preflight_failure = Some(error);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Apply a write the way Airtable does: null clears the cell, which then
/// disappears from the record.
fn apply(record: &mut Fields, fields: &Fields) {
    for (name, value) in fields {
        if value.is_null() {
            record.remove(name);
        } else {
            record.insert(name.clone(), value.clone());
        }
    }
}

impl RemoteTable for MockRemote {
    fn preflight(&self) -> RemoteResult<()> {
        match &self.lock().preflight_failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn list_page(&self, offset: Option<&str>) -> RemoteResult<RemotePage> {
        let mut state = self.lock();
        state.calls.push(MockCall::List(offset.map(str::to_string)));
        if let Some(err) = &state.list_failure {
            return Err(err.clone());
        }
        let start: usize = match offset {
            Some(o) => o
                .parse()
                .map_err(|_| RemoteError::Rejected {
                    status: 422,
                    message: format!("bad offset {o}"),
                })?,
            None => 0,
        };
        let records: Vec<RemoteRecord> = state
            .records
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|(id, fields)| RemoteRecord {
                id: id.clone(),
                created_time: None,
                fields: fields.clone(),
            })
            .collect();
        let next = start + records.len();
        let offset = (next < state.records.len()).then(|| next.to_string());
        Ok(RemotePage { records, offset })
    }

    fn create(&self, fields: &Fields) -> RemoteResult<RemoteRecord> {
        let mut state = self.lock();
        state.calls.push(MockCall::Create(fields.clone()));
        state.writes += 1;
        let n = state.writes;
        if let Some(err) = state.write_failures.remove(&n) {
            return Err(err);
        }
        state.next_id += 1;
        let id = format!("rec{:04}", state.next_id);
        let mut record = Fields::new();
        apply(&mut record, fields);
        state.records.insert(id.clone(), record.clone());
        Ok(RemoteRecord {
            id,
            created_time: None,
            fields: record,
        })
    }

    fn update(&self, id: &str, fields: &Fields) -> RemoteResult<RemoteRecord> {
        let mut state = self.lock();
        state
            .calls
            .push(MockCall::Update(id.to_string(), fields.clone()));
        state.writes += 1;
        let n = state.writes;
        if let Some(err) = state.write_failures.remove(&n) {
            return Err(err);
        }
        let Some(record) = state.records.get_mut(id) else {
            return Err(RemoteError::Rejected {
                status: 404,
                message: "NOT_FOUND".to_string(),
            });
        };
        apply(record, fields);
        Ok(RemoteRecord {
            id: id.to_string(),
            created_time: None,
            fields: record.clone(),
        })
    }
}
