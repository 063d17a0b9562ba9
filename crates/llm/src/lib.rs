use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use signalscout_config::LlmConfig;
use signalscout_core::ScoutError;

/// Output token budget for one generation.
pub const MAX_OUTPUT_TOKENS: u32 = 1024;
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

const SERVICE: &str = "llm";

/// Something that turns a prompt into raw text.
///
/// Implementations make exactly one model call and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ScoutError>;
}

// ── Anthropic Messages API ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl AnthropicClient {
    pub fn new(client: reqwest::Client, config: LlmConfig) -> Self {
        Self { client, config }
    }

    pub fn from_config(config: LlmConfig) -> Result<Self, ScoutError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ScoutError::configuration(format!("failed to build HTTP client: {err}")))?;
        Ok(Self::new(client, config))
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Default, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    message: String,
}

/// Request body for a single user-role message.
pub fn build_payload(model: &str, prompt: &str) -> serde_json::Value {
    json!({
        "model": model,
        "max_tokens": MAX_OUTPUT_TOKENS,
        "messages": [
            {"role": "user", "content": prompt}
        ]
    })
}

/// Text of the first `text` content block, or empty when there is none.
fn first_text_block(body: &str) -> Result<String, ScoutError> {
    let response: MessagesResponse = serde_json::from_str(body)
        .map_err(|err| ScoutError::external(SERVICE, format!("unreadable model response: {err}")))?;
    Ok(response
        .content
        .into_iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text)
        .unwrap_or_default())
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: Some(error),
        }) if !error.message.is_empty() => format!("{} ({status}): {}", error.kind, error.message),
        _ => format!("model API returned {status}"),
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, prompt: &str) -> Result<String, ScoutError> {
        let api_key = self.config.credential()?;
        let payload = build_payload(&self.config.model, prompt);

        debug!(model = %self.config.model, prompt_len = prompt.len(), "llm: sending prompt");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|err| ScoutError::external(SERVICE, format!("request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ScoutError::external(SERVICE, format!("failed to read body: {err}")))?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(%status, %message, "llm: model call failed");
            return Err(ScoutError::external(SERVICE, message));
        }

        let text = first_text_block(&body)?;
        if text.is_empty() {
            warn!(model = %self.config.model, "llm: response contained no text block");
        }
        Ok(text)
    }
}

// ── Structured output extraction ──────────────────────────────────────────────

/// The span from the first `{` to the last `}` of a model reply.
///
/// Greedy on purpose: nested objects stay intact and any prose or code
/// fences around the object fall away.  Returns `None` when there is no `{`
/// followed somewhere by a `}`.
pub fn extract_json_candidate(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

// ── Tests ────────────────────────────────────────────────────────────────────
