//! Per-connection command dispatch.

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::{self, ApiResponse};
use crate::{ClientCommand, ServerEvent};

use super::ServiceState;

pub(super) async fn handle_connection(
    stream: UnixStream,
    state: Arc<ServiceState>,
    shutdown_tx: watch::Sender<bool>,
) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(());
    }

    let command: ClientCommand = match serde_json::from_str(line.trim()) {
        Ok(command) => command,
        Err(err) => {
            warn!(%err, "daemon: malformed command");
            let response = ApiResponse::bad_request(format!("invalid request: {err}"));
            return send_event(&mut write_half, ServerEvent::Response(response)).await;
        }
    };

    match command {
        ClientCommand::Search(request) => {
            let response = api::handle_search(state.search.as_ref(), &request).await;
            info!(status = response.status, "daemon: search handled");
            send_event(&mut write_half, ServerEvent::Response(response)).await?;
        }
        ClientCommand::Synthesize(request) => {
            let response = api::handle_insights(&state.synthesis, &request).await;
            info!(status = response.status, "daemon: synthesis handled");
            send_event(&mut write_half, ServerEvent::Response(response)).await?;
        }
        ClientCommand::Ping => {
            send_event(&mut write_half, ServerEvent::Ack("pong".to_string())).await?;
        }
        ClientCommand::Shutdown => {
            let _ = shutdown_tx.send(true);
            send_event(
                &mut write_half,
                ServerEvent::Ack("shutdown requested".to_string()),
            )
            .await?;
        }
    }

    Ok(())
}

async fn send_event(
    writer: &mut tokio::net::unix::OwnedWriteHalf,
    event: ServerEvent,
) -> Result<()> {
    let encoded = serde_json::to_string(&event)?;
    writer.write_all(encoded.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}
