//! # signalscout-core
//!
//! Shared data model for the signal discovery and insight synthesis pipeline:
//! signals and search hits, the synthesis request and its result, and the
//! [`ScoutError`] taxonomy every other crate reports through.

mod error;
mod types;

pub use error::{GENERATION_FAILED, PARSE_FAILED, ScoutError, UPSTREAM_FAILED};
pub use types::{
    FEATURES_BOUNDS, InsightRequest, Insights, KEYWORDS_BOUNDS, MIN_SIGNALS, PAIN_POINTS_BOUNDS,
    PIVOTS_BOUNDS, REFINED_IDEA_SENTENCES, SearchResult, Signal, SignalSource,
};
