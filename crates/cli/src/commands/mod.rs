// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod lead;
pub mod stats;
pub mod sync;

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use lead_core::{FieldMap, LeadCache};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sync::{AirtableClient, SyncManager};

/// Open (and migrate) the cache at `db_path`, creating its directory.
pub fn open_cache(config: &Config, db_path: &Path) -> Result<LeadCache> {
    if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    debug!(path = %db_path.display(), "opening lead cache");
    Ok(LeadCache::open(db_path)?.with_max_age(config.max_age()))
}

/// Build the sync manager for the configured Airtable table.
///
/// Fails with a config error when there is no `[remote]` section. A missing
/// token is reported by the manager's preflight instead.
pub fn sync_manager(config: &Config) -> Result<SyncManager<AirtableClient>> {
    let remote = config.require_remote()?;
    let client = AirtableClient::new(remote, remote.token())
        .map_err(|e| Error::Config(e.to_string()))?;
    Ok(SyncManager::new(client, FieldMap::default()).with_push_delay(remote.push_delay()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
