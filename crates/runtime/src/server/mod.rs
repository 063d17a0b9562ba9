//! JSON-lines daemon exposing the search and synthesis handlers over a Unix socket.

mod connection;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::UnixListener;
use tokio::sync::watch;
use tracing::{error, info};

use signalscout_config::AppConfig;
use signalscout_insights::InsightSynthesisService;
use signalscout_llm::AnthropicClient;
use signalscout_search::{GoogleSearchClient, SearchIndex};

/// Immutable clients shared by every connection.  Nothing in here changes
/// between requests, so connections never wait on each other.
#[derive(Clone)]
pub struct ServiceState {
    pub search: Arc<dyn SearchIndex>,
    pub synthesis: InsightSynthesisService,
}

impl ServiceState {
    pub fn new(search: Arc<dyn SearchIndex>, synthesis: InsightSynthesisService) -> Self {
        Self { search, synthesis }
    }

    /// Production clients.  Missing credentials are not checked here: each
    /// request reports them as a configuration error instead.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let search = GoogleSearchClient::from_config(config.search.clone())?;
        let llm = AnthropicClient::from_config(config.llm.clone())?;
        info!(model = llm.model(), "generative model configured");
        Ok(Self::new(
            Arc::new(search),
            InsightSynthesisService::new(Arc::new(llm)),
        ))
    }
}

pub async fn run_daemon(config: &AppConfig) -> Result<()> {
    let state = ServiceState::from_config(config)?;
    run_daemon_with(state, &config.daemon.socket_path).await
}

/// Serve until a client sends `Shutdown`, then remove the socket file.
pub async fn run_daemon_with(state: ServiceState, socket_path: impl AsRef<Path>) -> Result<()> {
    let socket_path = socket_path.as_ref().to_path_buf();
    if socket_path.exists() {
        let _ = std::fs::remove_file(&socket_path);
    }

    let listener = UnixListener::bind(&socket_path)?;
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let state = Arc::new(state);
    info!(path = %socket_path.display(), "daemon listening");

    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_ok() && *shutdown_rx.borrow() {
                    break;
                }
            }
            accept = listener.accept() => {
                let (stream, _) = accept?;
                let state = state.clone();
                let shutdown_tx = shutdown_tx.clone();
                tokio::spawn(async move {
                    if let Err(err) = connection::handle_connection(stream, state, shutdown_tx).await {
                        error!(?err, "daemon connection handler failed");
                    }
                });
            }
        }
    }

    info!("daemon shutting down");
    let _ = std::fs::remove_file(&socket_path);
    Ok(())
}
