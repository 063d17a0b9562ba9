use std::env;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use signalscout_core::ScoutError;

pub const ENV_SEARCH_API_KEY: &str = "GOOGLE_SEARCH_API_KEY";
pub const ENV_SEARCH_ENGINE_ID: &str = "GOOGLE_SEARCH_ENGINE_ID";
pub const ENV_LLM_API_KEY: &str = "ANTHROPIC_API_KEY";

// ── Search index ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Custom Search API key.  Overridden by `GOOGLE_SEARCH_API_KEY`.
    pub api_key: String,
    /// Programmable search engine id (the `cx` scope).  Overridden by
    /// `GOOGLE_SEARCH_ENGINE_ID`.
    pub engine_id: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            engine_id: String::new(),
            endpoint: "https://www.googleapis.com/customsearch/v1".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Credentials required for one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCredentials {
    pub api_key: String,
    pub engine_id: String,
}

impl SearchConfig {
    /// Both the key and the scope id, or a configuration error naming the
    /// first one missing.  Blank values count as missing.
    pub fn credentials(&self) -> Result<SearchCredentials, ScoutError> {
        let api_key = non_blank(&self.api_key)
            .ok_or_else(|| ScoutError::configuration("search API key is not configured"))?;
        let engine_id = non_blank(&self.engine_id)
            .ok_or_else(|| ScoutError::configuration("search engine id is not configured"))?;
        Ok(SearchCredentials {
            api_key: api_key.to_string(),
            engine_id: engine_id.to_string(),
        })
    }
}

// ── Generative model ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Anthropic API key.  Overridden by `ANTHROPIC_API_KEY`.
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "claude-sonnet-4-20250514".to_string(),
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            timeout_secs: 60,
        }
    }
}

impl LlmConfig {
    pub fn credential(&self) -> Result<String, ScoutError> {
        non_blank(&self.api_key)
            .map(ToString::to_string)
            .ok_or_else(|| ScoutError::configuration("generative model API key is not configured"))
    }
}

// ── Daemon / telemetry ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub socket_path: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: "/tmp/signalscout.sock".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub daemon: DaemonConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load from a TOML file (defaults when it does not exist), then apply
    /// process environment overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_from_with_env(path, |name| env::var(name).ok())
    }

    /// Same as [`AppConfig::load_from`] with an explicit environment lookup.
    pub fn load_from_with_env(
        path: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)?;
        }

        // Non-empty env values take precedence over the file.
        let overrides = [
            (ENV_SEARCH_API_KEY, &mut config.search.api_key),
            (ENV_SEARCH_ENGINE_ID, &mut config.search.engine_id),
            (ENV_LLM_API_KEY, &mut config.llm.api_key),
        ];
        for (name, slot) in overrides {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                *slot = value;
            }
        }

        Ok(config)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

// ── Tests ────────────────────────────────────────────────────────────────────
