// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Airtable REST client.
//!
//! Blocking on purpose: the sync manager pushes one record at a time and
//! the CLI has nothing else to do while it waits.

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use lead_core::Fields;

use super::remote::{RemoteError, RemotePage, RemoteRecord, RemoteResult, RemoteTable};
use crate::config::RemoteConfig;

/// Largest page the list endpoint accepts.
const MAX_PAGE_SIZE: u32 = 100;

/// Error bodies longer than this are cut before they reach the sync log.
const MAX_ERROR_BODY: usize = 200;

/// [`RemoteTable`] backed by the Airtable REST API.
pub struct AirtableClient {
    client: Client,
    api_url: String,
    base_id: String,
    table_name: String,
    token: Option<String>,
    token_env: String,
    page_size: u32,
}

impl AirtableClient {
    /// Build a client for `remote`.
    ///
    /// A missing token is not an error here; [`RemoteTable::preflight`]
    /// reports it before any request is made.
    pub fn new(remote: &RemoteConfig, token: Option<String>) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(remote.timeout())
            .build()
            .map_err(|e| RemoteError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(AirtableClient {
            client,
            api_url: remote.api_url.clone(),
            base_id: remote.base_id.trim().to_string(),
            table_name: remote.table_name.trim().to_string(),
            token,
            token_env: remote.token_env.clone(),
            page_size: remote.page_size.clamp(1, MAX_PAGE_SIZE),
        })
    }

    fn table_url(&self) -> RemoteResult<Url> {
        table_url(&self.api_url, &self.base_id, &self.table_name)
    }

    fn record_url(&self, id: &str) -> RemoteResult<Url> {
        let mut url = self.table_url()?;
        url.path_segments_mut()
            .map_err(|_| RemoteError::Config(format!("invalid api_url: {}", self.api_url)))?
            .push(id);
        Ok(url)
    }

    fn missing_token(&self) -> RemoteError {
        RemoteError::Config(format!("missing API token (set {})", self.token_env))
    }

    fn token(&self) -> RemoteResult<&str> {
        self.token.as_deref().ok_or_else(|| self.missing_token())
    }

    /// Send a request and decode a successful JSON response.
    fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let response = request
            .bearer_auth(self.token()?)
            .send()
            .map_err(|e| RemoteError::Transient(format!("request failed: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|e| RemoteError::Transient(format!("cannot read response: {e}")))?;
        if !status.is_success() {
            return Err(classify_status(status, &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| RemoteError::Transient(format!("invalid response: {e}")))
    }
}

impl RemoteTable for AirtableClient {
    fn preflight(&self) -> RemoteResult<()> {
        if matches!(self.token.as_deref(), None | Some("")) {
            return Err(self.missing_token());
        }
        if self.base_id.is_empty() {
            return Err(RemoteError::Config("remote.base_id is empty".to_string()));
        }
        if self.table_name.is_empty() {
            return Err(RemoteError::Config("remote.table_name is empty".to_string()));
        }
        self.table_url().map(|_| ())
    }

    fn list_page(&self, offset: Option<&str>) -> RemoteResult<RemotePage> {
        let mut url = self.table_url()?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("pageSize", &self.page_size.to_string());
            if let Some(offset) = offset {
                query.append_pair("offset", offset);
            }
        }
        debug!(%url, "listing remote records");
        self.execute(self.client.get(url))
    }

    fn create(&self, fields: &Fields) -> RemoteResult<RemoteRecord> {
        let url = self.table_url()?;
        self.execute(self.client.post(url).json(&write_body(fields)))
    }

    fn update(&self, id: &str, fields: &Fields) -> RemoteResult<RemoteRecord> {
        let url = self.record_url(id)?;
        self.execute(self.client.patch(url).json(&write_body(fields)))
    }
}

/// `{api_url}/{base_id}/{table_name}` with each segment percent-encoded.
pub(crate) fn table_url(api_url: &str, base_id: &str, table_name: &str) -> RemoteResult<Url> {
    let invalid = || RemoteError::Config(format!("invalid api_url: {api_url}"));
    let mut url = Url::parse(api_url).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .push(base_id)
        .push(table_name);
    Ok(url)
}

/// Body for create and update. `typecast` lets Airtable add unseen
/// single-select options (new statuses) instead of rejecting the write.
pub(crate) fn write_body(fields: &Fields) -> Value {
    json!({ "fields": fields, "typecast": true })
}

/// Map a non-success response onto a [`RemoteError`].
pub(crate) fn classify_status(status: StatusCode, body: &str) -> RemoteError {
    let message = error_message(body);
    if status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
    {
        RemoteError::Transient(format!("HTTP {}: {message}", status.as_u16()))
    } else {
        RemoteError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Pull a readable message out of an Airtable error body.
///
/// Airtable sends either `{"error": {"type": .., "message": ..}}` or
/// `{"error": "TYPE"}`; anything else is passed through, truncated.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match &value["error"] {
            Value::String(kind) => return kind.clone(),
            Value::Object(error) => {
                let kind = error.get("type").and_then(Value::as_str);
                let message = error.get("message").and_then(Value::as_str);
                match (kind, message) {
                    (Some(kind), Some(message)) => return format!("{kind}: {message}"),
                    (Some(only), None) | (None, Some(only)) => return only.to_string(),
                    (None, None) => {}
                }
            }
            _ => {}
        }
    }
    let body = body.trim();
    if body.is_empty() {
        return "no details".to_string();
    }
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
#[path = "airtable_tests.rs"]
mod tests;
