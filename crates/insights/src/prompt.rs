//! Prompt assembly for the insight synthesis call.
//!
//! Pure and synchronous: the same request always renders the same prompt.
//! Signals are numbered in input order, which the model's reasoning refers
//! back to, so callers must not reorder them between builds.

use signalscout_core::{InsightRequest, Signal};

/// Characters of signal content quoted per signal.
pub const CONTENT_EXCERPT_CHARS: usize = 500;

const NO_CONTENT: &str = "No content";
const PAIN_NOT_SPECIFIED: &str = "Not specified";

// ─── public entry point ──────────────────────────────────────────────────────

pub fn build_insight_prompt(request: &InsightRequest) -> String {
    let pain = request
        .project_pain
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(PAIN_NOT_SPECIFIED);

    format!(
        "You are a product strategist helping a founder validate a startup idea \
         using real posts from people describing their problems.\n\n\
         PROJECT: {name}\n\
         PAIN POINT: {pain}\n\n\
         Below are {count} signals collected from online discussions. Each has an \
         intent score (1-5, how strongly the author shows genuine pain or willingness \
         to pay), the community it came from, an excerpt, optional founder notes, \
         and its outreach status.\n\n\
         SIGNALS:\n\n\
         {signals}\n\n\
         {instructions}",
        name = request.project_name.trim(),
        pain = pain,
        count = request.signals.len(),
        signals = build_signals_block(&request.signals),
        instructions = OUTPUT_INSTRUCTIONS,
    )
}

// ─── block builders ──────────────────────────────────────────────────────────

fn build_signals_block(signals: &[Signal]) -> String {
    signals
        .iter()
        .enumerate()
        .map(|(index, signal)| summarize_signal(index + 1, signal))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Position, intent, community, excerpt, notes (when present), status.
fn summarize_signal(position: usize, signal: &Signal) -> String {
    let community = if signal.subreddit.trim().is_empty() {
        "unknown community".to_string()
    } else {
        format!("r/{}", signal.subreddit.trim())
    };
    let excerpt = signal
        .content
        .as_deref()
        .map(|content| excerpt(content, CONTENT_EXCERPT_CHARS))
        .filter(|content| !content.trim().is_empty())
        .unwrap_or_else(|| NO_CONTENT.to_string());

    let mut summary = format!(
        "Signal {position} (intent {score}/5, {community}):\n{excerpt}",
        score = signal.intent_score,
    );
    if let Some(notes) = signal.notes.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        summary.push_str(&format!("\nNotes: {notes}"));
    }
    summary.push_str(&format!("\nStatus: {}", signal.status));
    summary
}

/// First `max_chars` characters, never splitting a code point.
fn excerpt(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

const OUTPUT_INSTRUCTIONS: &str = "\
Analyze these signals and respond with these six fields:
1. painPoints: 3-5 specific pain points the signals actually describe, phrased in the users' terms.
2. features: 4-6 concrete features that would address those pain points, most important first.
3. pivots: 2-3 alternative directions or adjacent opportunities the signals suggest.
4. keywords: 8-12 search keywords and phrases these users use, for finding more signals.
5. refinedIdea: a refined 2-3 sentence pitch for the product, grounded in the evidence.
6. communities: the unique community names (without the r/ prefix) these signals came from.

Ground every claim in the signals above and reference what people actually said. \
Avoid generic startup advice and filler that could apply to any product.

Return ONLY a JSON object with exactly these keys: \
{\"painPoints\": [], \"features\": [], \"pivots\": [], \"keywords\": [], \"refinedIdea\": \"\", \"communities\": []}. \
Do not wrap it in markdown code fences and do not add any text before or after it.";
