//! # signalscout-insights
//!
//! Synthesis of founder-facing insights from a curated signal batch:
//! - [`prompt`]: renders the bounded prompt for a request
//! - [`parser`]: recovers the JSON object from untrusted model text
//! - [`InsightSynthesisService`]: validates, generates, parses

pub mod parser;
pub mod prompt;
mod service;

pub use parser::parse_insights;
pub use prompt::build_insight_prompt;
pub use service::InsightSynthesisService;
