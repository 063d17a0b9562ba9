use serde::{Deserialize, Serialize};

use signalscout_core::InsightRequest;

use crate::api::{ApiResponse, SearchRequest};

/// One JSON line sent by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientCommand {
    Search(SearchRequest),
    Synthesize(InsightRequest),
    Ping,
    Shutdown,
}

/// One JSON line sent back by the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerEvent {
    Response(ApiResponse),
    Ack(String),
}
