use std::sync::Arc;

use tracing::{error, info, warn};

use signalscout_core::{GENERATION_FAILED, InsightRequest, Insights, PARSE_FAILED, ScoutError};
use signalscout_llm::TextGenerator;

use crate::parser::parse_insights;
use crate::prompt::build_insight_prompt;

/// Prompt → model → parser, all or nothing.
///
/// Holds no per-call state; one instance can serve concurrent requests.
#[derive(Clone)]
pub struct InsightSynthesisService {
    generator: Arc<dyn TextGenerator>,
}

impl InsightSynthesisService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Synthesize insights from a curated signal batch.
    ///
    /// Fewer than three signals fails with [`ScoutError::Validation`] before
    /// the model is called.  Generation and parse failures are logged in full
    /// and surface only as [`ScoutError::Synthesis`] with a caller-safe message.
    /// Configuration errors pass through unchanged.
    pub async fn synthesize(&self, request: &InsightRequest) -> Result<Insights, ScoutError> {
        request.validate()?;

        let prompt = build_insight_prompt(request);
        info!(
            project = %request.project_name,
            signals = request.signals.len(),
            prompt_len = prompt.len(),
            "synthesis: generating insights"
        );

        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(err @ ScoutError::Configuration(_)) => return Err(err),
            Err(err) => {
                error!(error = %err, "synthesis: generation failed");
                return Err(ScoutError::Synthesis(GENERATION_FAILED.to_string()));
            }
        };

        let insights = match parse_insights(&raw) {
            Ok(insights) => insights,
            Err(err) => {
                error!(error = %err, raw = %raw, "synthesis: failed to parse model response");
                return Err(ScoutError::Synthesis(PARSE_FAILED.to_string()));
            }
        };

        for warning in insights.shape_warnings() {
            warn!(%warning, "synthesis: response outside requested shape");
        }
        info!(
            pain_points = insights.pain_points.len(),
            features = insights.features.len(),
            communities = insights.communities.len(),
            "synthesis: complete"
        );
        Ok(insights)
    }
}
