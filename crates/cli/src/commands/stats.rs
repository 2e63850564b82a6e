// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::Duration;

use lead_core::LeadCache;

use crate::cli::OutputFormat;
use crate::display::{format_stats, format_time};
use crate::error::{Error, Result};

use super::{print_json, print_lines};

pub fn stats(cache: &LeadCache, output: OutputFormat) -> Result<()> {
    let stats = cache.stats()?;
    match output {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Text => {
            print_lines(&format_stats(&stats));
            Ok(())
        }
    }
}

/// Succeed if the cache was pulled within `max_age`, else [`Error::Stale`].
pub fn fresh(cache: &LeadCache, max_age: Duration) -> Result<()> {
    fresh_impl(cache, max_age)?;
    println!("fresh");
    Ok(())
}

pub(crate) fn fresh_impl(cache: &LeadCache, max_age: Duration) -> Result<()> {
    if cache.is_fresh(max_age)? {
        return Ok(());
    }
    let last_sync = match cache.database().last_global_sync_at()? {
        Some(at) => format_time(at),
        None => "never".to_string(),
    };
    Err(Error::Stale { last_sync })
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod tests;
