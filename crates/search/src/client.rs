//! Google Programmable Search client scoped to recent reddit discussions.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use signalscout_config::{SearchConfig, SearchCredentials};
use signalscout_core::{ScoutError, SearchResult};

use crate::SearchIndex;
use crate::normalize::{RawItem, normalize};

/// Per-call maximum the index accepts for `num`.
pub const MAX_RESULTS_PER_CALL: u32 = 10;
pub const DEFAULT_NUM_RESULTS: u32 = 10;
/// Only results from the last 30 days.
pub const RECENCY_WINDOW: &str = "d30";
pub const SOURCE_DOMAIN: &str = "reddit.com";

const SERVICE: &str = "search";

#[derive(Debug, Default, Deserialize)]
struct IndexResponse {
    #[serde(default)]
    items: Vec<RawItem>,
    #[serde(default)]
    error: Option<IndexError>,
}

#[derive(Debug, Default, Deserialize)]
struct IndexError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct GoogleSearchClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl GoogleSearchClient {
    pub fn new(http: reqwest::Client, config: SearchConfig) -> Self {
        Self { http, config }
    }

    /// Build a client with its own HTTP connection pool and the configured timeout.
    pub fn from_config(config: SearchConfig) -> Result<Self, ScoutError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("signalscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| ScoutError::configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::new(http, config))
    }
}

/// Clamp the requested count into `1..=MAX_RESULTS_PER_CALL`.
pub fn clamp_num_results(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_NUM_RESULTS)
        .clamp(1, MAX_RESULTS_PER_CALL)
}

/// Query parameters for one index call.
pub fn build_query_params(
    credentials: &SearchCredentials,
    query: &str,
    num_results: u32,
) -> Vec<(&'static str, String)> {
    vec![
        ("key", credentials.api_key.clone()),
        ("cx", credentials.engine_id.clone()),
        ("q", format!("{} site:{SOURCE_DOMAIN}", query.trim())),
        ("num", num_results.to_string()),
        ("dateRestrict", RECENCY_WINDOW.to_string()),
    ]
}

/// Decode an index reply.  An `error` object wins over any items; a
/// non-success status without one is still an error.
fn decode_response(status: reqwest::StatusCode, body: &str) -> Result<Vec<RawItem>, ScoutError> {
    let parsed = serde_json::from_str::<IndexResponse>(body);

    match parsed {
        Ok(IndexResponse {
            error: Some(error), ..
        }) => {
            let message = if error.message.is_empty() {
                format!("index returned error code {}", error.code.unwrap_or(status.as_u16()))
            } else {
                error.message
            };
            Err(ScoutError::external(SERVICE, message))
        }
        Ok(_) if !status.is_success() => {
            Err(ScoutError::external(SERVICE, format!("index returned {status}")))
        }
        Ok(response) => Ok(response.items),
        Err(err) if status.is_success() => Err(ScoutError::external(
            SERVICE,
            format!("unreadable index response: {err}"),
        )),
        Err(_) => Err(ScoutError::external(SERVICE, format!("index returned {status}"))),
    }
}

#[async_trait]
impl SearchIndex for GoogleSearchClient {
    async fn search(
        &self,
        query: &str,
        num_results: Option<u32>,
    ) -> Result<Vec<SearchResult>, ScoutError> {
        if query.trim().is_empty() {
            return Err(ScoutError::validation("query is required"));
        }
        let credentials = self.config.credentials()?;
        let num = clamp_num_results(num_results);

        info!(query, num, "search: querying index");

        let resp = self
            .http
            .get(&self.config.endpoint)
            .query(&build_query_params(&credentials, query, num))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| ScoutError::external(SERVICE, format!("request failed: {err}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| ScoutError::external(SERVICE, format!("failed to read body: {err}")))?;

        let items = decode_response(status, &body).inspect_err(|err| {
            warn!(%status, error = %err, "search: index reported an error");
        })?;

        let results = items.iter().map(normalize).collect::<Vec<_>>();
        info!(query, count = results.len(), "search: complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const FIXTURE: &str = r#"{
        "kind": "customsearch#search",
        "items": [
            {
                "title": "Invoicing is a nightmare : r/smallbusiness",
                "link": "https://www.reddit.com/r/smallbusiness/comments/1/invoicing/",
                "snippet": "posted by jane_doe. I still do invoices in Excel."
            },
            {
                "title": "Any tool for recurring invoices? - Reddit",
                "link": "https://www.reddit.com/r/freelance/comments/2/tools/"
            }
        ]
    }"#;

    fn creds() -> SearchCredentials {
        SearchCredentials {
            api_key: "key-1".to_string(),
            engine_id: "cx-1".to_string(),
        }
    }

    #[test]
    fn num_results_is_capped_and_defaulted() {
        assert_eq!(clamp_num_results(Some(25)), 10);
        assert_eq!(clamp_num_results(Some(5)), 5);
        assert_eq!(clamp_num_results(Some(0)), 1);
        assert_eq!(clamp_num_results(None), 10);
    }

    #[test]
    fn query_params_scope_domain_and_recency() {
        let params = build_query_params(&creds(), "  spreadsheet invoicing ", 10);
        assert_eq!(
            params,
            vec![
                ("key", "key-1".to_string()),
                ("cx", "cx-1".to_string()),
                ("q", "spreadsheet invoicing site:reddit.com".to_string()),
                ("num", "10".to_string()),
                ("dateRestrict", "d30".to_string()),
            ]
        );
    }

    #[test]
    fn decodes_items() {
        let items = decode_response(StatusCode::OK, FIXTURE).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].snippet, None);
    }

    #[test]
    fn response_without_items_is_empty() {
        let items = decode_response(StatusCode::OK, r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn error_payload_propagates_index_message() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded for quota metric 'Queries'"}}"#;
        let err = decode_response(StatusCode::TOO_MANY_REQUESTS, body).unwrap_err();
        match err {
            ScoutError::ExternalService { service, message } => {
                assert_eq!(service, "search");
                assert!(message.contains("Quota exceeded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_json_failure_is_external_error() {
        let err = decode_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, ScoutError::ExternalService { .. }));
    }
}
