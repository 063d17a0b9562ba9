use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ScoutError;

/// Smallest signal batch the synthesis pipeline accepts.
pub const MIN_SIGNALS: usize = 3;

// ── Signals ───────────────────────────────────────────────────────────────────

/// Where a signal was discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    #[default]
    Google,
    Manual,
}

/// A curated post or comment kept as validation evidence.
///
/// The core never mutates a signal; `status` and `notes` belong to the caller's
/// store and are echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Caller-assigned strength of pain or purchase intent, usually 1–5.
    pub intent_score: f64,
    /// Community name without the `r/` prefix; empty when unknown.
    #[serde(default)]
    pub subreddit: String,
    /// Lifecycle tag such as `new`, `contacted`, `converted`. Opaque to the core.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub source: SignalSource,
}

fn default_status() -> String {
    "new".to_string()
}

/// A normalized hit from the external search index. Request-scoped; the URL
/// is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub subreddit: String,
    pub author: String,
    pub source: SignalSource,
}

// ── Synthesis request ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_pain: Option<String>,
    #[serde(default)]
    pub signals: Vec<Signal>,
}

impl InsightRequest {
    /// Reject batches that are too small to synthesize from.
    pub fn validate(&self) -> Result<(), ScoutError> {
        if self.signals.len() < MIN_SIGNALS {
            return Err(ScoutError::validation(format!(
                "insufficient signals: at least {MIN_SIGNALS} are required, got {}",
                self.signals.len()
            )));
        }
        Ok(())
    }
}

// ── Insights ──────────────────────────────────────────────────────────────────

pub const PAIN_POINTS_BOUNDS: RangeInclusive<usize> = 3..=5;
pub const FEATURES_BOUNDS: RangeInclusive<usize> = 4..=6;
pub const PIVOTS_BOUNDS: RangeInclusive<usize> = 2..=3;
pub const KEYWORDS_BOUNDS: RangeInclusive<usize> = 8..=12;
pub const REFINED_IDEA_SENTENCES: RangeInclusive<usize> = 2..=3;

/// Founder-facing synthesis result.
///
/// Fields missing from the model reply, or sent as `null`, deserialize as
/// empty; a wrong type (e.g. a string where an array is expected) is a hard
/// parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Insights {
    #[serde(deserialize_with = "null_as_default")]
    pub pain_points: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub features: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub pivots: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub refined_idea: String,
    #[serde(deserialize_with = "null_as_default")]
    pub communities: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Insights {
    /// Advisory review of the shape the prompt asks for.
    ///
    /// Never used to reject a reply: the generator is untrusted and counts
    /// are guidance only. Returns one human-readable line per deviation.
    pub fn shape_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (field, items, bounds) in [
            ("painPoints", &self.pain_points, PAIN_POINTS_BOUNDS),
            ("features", &self.features, FEATURES_BOUNDS),
            ("pivots", &self.pivots, PIVOTS_BOUNDS),
            ("keywords", &self.keywords, KEYWORDS_BOUNDS),
        ] {
            if !bounds.contains(&items.len()) {
                warnings.push(format!(
                    "{field}: expected {}-{} items, got {}",
                    bounds.start(),
                    bounds.end(),
                    items.len()
                ));
            }
            let blanks = items.iter().filter(|item| item.trim().is_empty()).count();
            if blanks > 0 {
                warnings.push(format!("{field}: {blanks} empty item(s)"));
            }
        }

        let blank_communities = self
            .communities
            .iter()
            .filter(|c| c.trim().is_empty())
            .count();
        if blank_communities > 0 {
            warnings.push(format!("communities: {blank_communities} empty item(s)"));
        }

        if self.refined_idea.trim().is_empty() {
            warnings.push("refinedIdea: missing or empty".to_string());
        } else {
            let sentences = count_sentences(&self.refined_idea);
            if !REFINED_IDEA_SENTENCES.contains(&sentences) {
                warnings.push(format!(
                    "refinedIdea: expected {}-{} sentences, got {sentences}",
                    REFINED_IDEA_SENTENCES.start(),
                    REFINED_IDEA_SENTENCES.end()
                ));
            }
        }

        warnings
    }
}

/// Rough sentence count: runs of terminal punctuation close a sentence, and
/// trailing text without punctuation counts as one more.
fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut pending = false;
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if pending {
                count += 1;
                pending = false;
            }
            while matches!(chars.peek(), Some('.' | '!' | '?')) {
                chars.next();
            }
        } else if !ch.is_whitespace() {
            pending = true;
        }
    }
    if pending {
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signal(score: f64, subreddit: &str) -> Signal {
        Signal {
            content: Some("I hate reconciling invoices by hand".to_string()),
            notes: None,
            intent_score: score,
            subreddit: subreddit.to_string(),
            status: "new".to_string(),
            url: format!("https://www.reddit.com/r/{subreddit}/comments/abc"),
            author: "someone".to_string(),
            source: SignalSource::Google,
        }
    }

    fn well_formed() -> Insights {
        Insights {
            pain_points: vec!["a".into(), "b".into(), "c".into()],
            features: vec!["f1".into(), "f2".into(), "f3".into(), "f4".into()],
            pivots: vec!["p1".into(), "p2".into()],
            keywords: (0..8).map(|i| format!("k{i}")).collect(),
            refined_idea: "Invoice autopilot for freelancers. It reconciles payments.".to_string(),
            communities: vec!["saas".into()],
        }
    }

    #[test]
    fn request_with_two_signals_is_rejected() {
        let request = InsightRequest {
            project_name: "Ledgerly".to_string(),
            project_pain: None,
            signals: vec![signal(5.0, "saas"), signal(4.0, "startups")],
        };
        let err = request.validate().unwrap_err();
        assert!(matches!(err, ScoutError::Validation(ref m) if m.contains("insufficient signals")));
    }

    #[test]
    fn request_with_three_signals_is_accepted() {
        let request = InsightRequest {
            project_name: "Ledgerly".to_string(),
            project_pain: Some("manual invoicing".to_string()),
            signals: vec![signal(5.0, "saas"), signal(4.0, "startups"), signal(3.0, "saas")],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn signal_deserializes_from_camel_case_with_defaults() {
        let json = r#"{"intentScore": 4, "subreddit": "smallbusiness", "content": "ugh"}"#;
        let signal: Signal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.intent_score, 4.0);
        assert_eq!(signal.subreddit, "smallbusiness");
        assert_eq!(signal.status, "new");
        assert_eq!(signal.source, SignalSource::Google);
        assert!(signal.notes.is_none());
    }

    #[test]
    fn insights_missing_fields_default_to_empty() {
        let insights: Insights = serde_json::from_str(r#"{"painPoints":["a"]}"#).unwrap();
        assert_eq!(insights.pain_points, vec!["a".to_string()]);
        assert!(insights.features.is_empty());
        assert_eq!(insights.refined_idea, "");
    }

    #[test]
    fn insights_null_fields_default_to_empty() {
        let insights: Insights =
            serde_json::from_str(r#"{"painPoints":["a"],"pivots":null,"refinedIdea":null}"#)
                .unwrap();
        assert_eq!(insights.pain_points, vec!["a".to_string()]);
        assert!(insights.pivots.is_empty());
        assert_eq!(insights.refined_idea, "");
    }

    #[test]
    fn insights_wrong_field_type_is_rejected() {
        let result = serde_json::from_str::<Insights>(r#"{"painPoints":"not a list"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn well_formed_insights_have_no_warnings() {
        assert!(well_formed().shape_warnings().is_empty());
    }

    #[test]
    fn out_of_bounds_counts_are_reported_not_rejected() {
        let mut insights = well_formed();
        insights.pain_points = vec!["only one".into()];
        insights.keywords.push(String::new());
        insights.refined_idea = String::new();

        let warnings = insights.shape_warnings();
        assert_eq!(
            warnings,
            vec![
                "painPoints: expected 3-5 items, got 1".to_string(),
                "keywords: 1 empty item(s)".to_string(),
                "refinedIdea: missing or empty".to_string(),
            ]
        );
    }

    #[test]
    fn sentence_counting() {
        assert_eq!(count_sentences("One. Two! Three?"), 3);
        assert_eq!(count_sentences("Wait... really"), 2);
        assert_eq!(count_sentences("   "), 0);
    }
}
