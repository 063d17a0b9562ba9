pub mod api;
mod client;
mod commands;
mod server;

pub use api::{ApiResponse, SearchRequest, handle_insights, handle_search};
pub use client::DaemonClient;
pub use commands::{ClientCommand, ServerEvent};
pub use server::{ServiceState, run_daemon, run_daemon_with};
