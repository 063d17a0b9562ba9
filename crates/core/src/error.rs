//! Error taxonomy shared by the search and synthesis pipelines.

use thiserror::Error;

/// Message returned to callers when the generative step fails.
pub const GENERATION_FAILED: &str = "Failed to generate insights";

/// Message returned to callers when the model reply cannot be recovered as JSON.
pub const PARSE_FAILED: &str = "Failed to parse AI response";

/// Message returned to callers in place of upstream error details.
pub const UPSTREAM_FAILED: &str = "Upstream service request failed";

/// Errors produced by the signal discovery and insight synthesis core.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Caller input violates a precondition (e.g. fewer than three signals,
    /// empty search query).
    #[error("validation error: {0}")]
    Validation(String),

    /// A required credential or scope identifier is not configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The search index or generative model failed at the transport or API level.
    #[error("{service} error: {message}")]
    ExternalService {
        /// Which upstream produced the failure (`search`, `llm`).
        service: &'static str,
        /// Upstream message or transport error text.
        message: String,
    },

    /// The model reply could not be recovered as an Insights JSON object.
    #[error("parse error: {message}")]
    Parse {
        /// Deserializer message.
        message: String,
        /// The unmodified model text, kept for diagnostic logging only.
        raw: String,
    },

    /// Caller-facing wrapper over generation and parse failures.
    #[error("synthesis error: {0}")]
    Synthesis(String),
}

impl ScoutError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn external(service: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
        }
    }

    /// Boundary status code: 400 for caller mistakes, 500 for everything else.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Text that is safe to hand to an end caller.
    ///
    /// Upstream error bodies and raw model output never leave through here;
    /// they are only available via `Display`/`Debug` for logging.
    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(message)
            | Self::Configuration(message)
            | Self::Synthesis(message) => message.clone(),
            Self::ExternalService { .. } => UPSTREAM_FAILED.to_string(),
            Self::Parse { .. } => PARSE_FAILED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = ScoutError::validation("insufficient signals");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.public_message(), "insufficient signals");
    }

    #[test]
    fn configuration_message_is_passed_through() {
        let err = ScoutError::configuration("search api key is not configured");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), "search api key is not configured");
    }

    #[test]
    fn external_details_stay_out_of_public_message() {
        let err = ScoutError::external("search", "Daily Limit Exceeded for key AIza-secret");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), UPSTREAM_FAILED);
        assert!(err.to_string().contains("Daily Limit Exceeded"));
    }

    #[test]
    fn parse_error_hides_raw_text() {
        let err = ScoutError::Parse {
            message: "expected value at line 1 column 1".to_string(),
            raw: "I'm sorry, I can't do that".to_string(),
        };
        assert_eq!(err.public_message(), PARSE_FAILED);
        assert!(!err.public_message().contains("sorry"));
    }

    #[test]
    fn synthesis_message_is_caller_safe() {
        let err = ScoutError::Synthesis(GENERATION_FAILED.to_string());
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.public_message(), GENERATION_FAILED);
    }
}
