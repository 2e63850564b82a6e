// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Env var the test configs read the API token from.
pub const TOKEN_ENV: &str = "LEADSYNC_TEST_API_KEY";

/// `leadsync` isolated from the caller's environment.
pub fn leadsync() -> Command {
    let mut cmd = cargo_bin_cmd!("leadsync");
    cmd.env_remove("LEADSYNC_CONFIG")
        .env_remove("LEADSYNC_DB")
        .env_remove("AIRTABLE_API_KEY")
        .env_remove(TOKEN_ENV)
        .env_remove("RUST_LOG");
    cmd
}

/// `leadsync` running in `temp`, which holds the config and database.
pub fn leadsync_in(temp: &TempDir) -> Command {
    let mut cmd = leadsync();
    cmd.current_dir(temp.path());
    cmd
}

/// Write `leadsync.toml` into `temp`.
pub fn write_config(temp: &TempDir, contents: &str) {
    fs::write(temp.path().join("leadsync.toml"), contents).unwrap();
}

/// Config pointing at a port nothing listens on, so every request fails
/// fast with a connection error.
pub fn unreachable_remote_config(temp: &TempDir) {
    write_config(
        temp,
        &format!(
            r#"
[remote]
base_id = "appTest"
table_name = "Leads"
api_url = "http://127.0.0.1:9/v0"
token_env = "{TOKEN_ENV}"
push_delay_ms = 0
timeout_secs = 2
"#
        ),
    );
}

/// Add a lead and return its id.
pub fn add_lead(temp: &TempDir, name: &str, extra: &[&str]) -> i64 {
    let output = leadsync_in(temp)
        .args(["add", "--name", name])
        .args(extra)
        .output()
        .unwrap();
    assert!(output.status.success(), "add failed: {output:?}");

    String::from_utf8_lossy(&output.stdout)
        .trim()
        .trim_start_matches("Added lead ")
        .parse()
        .unwrap()
}
