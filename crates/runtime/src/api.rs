//! Inbound request handlers.
//!
//! Transport-neutral: each handler takes a decoded request and returns the
//! status code and JSON body the boundary should send.  Errors are logged
//! here with full detail; only [`ScoutError::public_message`] reaches the body.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info};

use signalscout_core::{InsightRequest, ScoutError};
use signalscout_insights::InsightSynthesisService;
use signalscout_search::SearchIndex;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: 400,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn from_error(err: &ScoutError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.public_message() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `error` field of a failure body, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.body.get("error").and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub num_results: Option<u32>,
}

fn log_failure(operation: &str, err: &ScoutError) {
    if err.status_code() >= 500 {
        error!(operation, error = %err, "request failed");
    } else {
        info!(operation, error = %err, "request rejected");
    }
}

/// `{query, numResults?}` → `{results}`.
pub async fn handle_search(index: &dyn SearchIndex, request: &SearchRequest) -> ApiResponse {
    if request.query.trim().is_empty() {
        return ApiResponse::bad_request("query is required");
    }

    match index.search(&request.query, request.num_results).await {
        Ok(results) => ApiResponse::ok(json!({ "results": results })),
        Err(err) => {
            log_failure("search", &err);
            ApiResponse::from_error(&err)
        }
    }
}

/// `{projectName, projectPain?, signals}` → `{insights}`.
pub async fn handle_insights(
    service: &InsightSynthesisService,
    request: &InsightRequest,
) -> ApiResponse {
    match service.synthesize(request).await {
        Ok(insights) => ApiResponse::ok(json!({ "insights": insights })),
        Err(err) => {
            log_failure("insights", &err);
            ApiResponse::from_error(&err)
        }
    }
}
