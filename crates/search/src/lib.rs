//! # signalscout-search
//!
//! Candidate signal discovery: a recency- and domain-scoped query against an
//! external search index, with every hit normalized into a [`SearchResult`].

mod client;
pub mod normalize;

pub use client::{
    DEFAULT_NUM_RESULTS, GoogleSearchClient, MAX_RESULTS_PER_CALL, RECENCY_WINDOW, SOURCE_DOMAIN,
    build_query_params, clamp_num_results,
};
pub use normalize::{RawItem, normalize};

use async_trait::async_trait;

use signalscout_core::{ScoutError, SearchResult};

/// A source of candidate signals.
///
/// One outbound call per invocation, no retries.  `num_results` defaults to
/// [`DEFAULT_NUM_RESULTS`] and is capped at [`MAX_RESULTS_PER_CALL`].
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn search(
        &self,
        query: &str,
        num_results: Option<u32>,
    ) -> Result<Vec<SearchResult>, ScoutError>;
}
