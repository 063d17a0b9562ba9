use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::warn;

use signalscout_core::InsightRequest;

use crate::api::{ApiResponse, SearchRequest};
use crate::{ClientCommand, ServerEvent};

#[derive(Debug, Clone)]
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    /// Wait for the daemon socket to accept connections.  Only the connect is
    /// retried; requests are never resent.
    pub async fn connect_with_backoff(&self, max_attempts: usize) -> Result<()> {
        let mut delay = Duration::from_millis(100);
        for attempt in 0..max_attempts.max(1) {
            match UnixStream::connect(&self.socket_path).await {
                Ok(_) => return Ok(()),
                Err(err) => {
                    if attempt + 1 == max_attempts.max(1) {
                        return Err(err.into());
                    }
                    warn!(attempt, ?err, "daemon connect failed; retrying");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(Duration::from_secs(2));
                }
            }
        }
        Ok(())
    }

    pub async fn search(&self, request: SearchRequest) -> Result<ApiResponse> {
        self.expect_response(ClientCommand::Search(request)).await
    }

    pub async fn synthesize(&self, request: InsightRequest) -> Result<ApiResponse> {
        self.expect_response(ClientCommand::Synthesize(request)).await
    }

    pub async fn ping(&self) -> Result<String> {
        match self.request(ClientCommand::Ping).await? {
            ServerEvent::Ack(message) => Ok(message),
            other => bail!("unexpected daemon reply to ping: {other:?}"),
        }
    }

    pub async fn graceful_shutdown(&self) -> Result<()> {
        let _ = self.request(ClientCommand::Shutdown).await?;
        Ok(())
    }

    async fn expect_response(&self, command: ClientCommand) -> Result<ApiResponse> {
        match self.request(command).await? {
            ServerEvent::Response(response) => Ok(response),
            other => bail!("unexpected daemon reply: {other:?}"),
        }
    }

    async fn request(&self, command: ClientCommand) -> Result<ServerEvent> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (read_half, mut write_half) = stream.into_split();

        let request = serde_json::to_string(&command)?;
        write_half.write_all(request.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        write_half.flush().await?;

        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            bail!("daemon closed the connection without replying; check daemon logs");
        }
        Ok(serde_json::from_str(line.trim())?)
    }
}
