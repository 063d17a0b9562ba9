//! Recovery of an [`Insights`] object from raw model text.
//!
//! Two stages, no further repair: take the span from the first `{` to the
//! last `}` when there is one (otherwise the whole text), then parse it
//! strictly.  Prose or code fences around a single object are tolerated;
//! anything else is a [`ScoutError::Parse`] carrying the raw text.

use signalscout_core::{Insights, ScoutError};
use signalscout_llm::extract_json_candidate;

pub fn parse_insights(raw: &str) -> Result<Insights, ScoutError> {
    let candidate = extract_json_candidate(raw).unwrap_or(raw);

    serde_json::from_str::<Insights>(candidate).map_err(|err| ScoutError::Parse {
        message: err.to_string(),
        raw: raw.to_string(),
    })
}
