use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use signalscout_config::AppConfig;
use signalscout_core::InsightRequest;
use signalscout_runtime::{
    ApiResponse, DaemonClient, SearchRequest, ServiceState, handle_insights, handle_search,
    run_daemon,
};

#[derive(Debug, Parser)]
#[command(
    name = "signalscout",
    version,
    about = "Find people describing a pain point and turn their posts into product insights"
)]
struct Cli {
    /// Configuration file (TOML).  Missing file means defaults plus environment.
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search recent discussions for candidate signals.
    Search {
        query: String,
        /// Number of results (capped at 10).
        #[arg(long, short)]
        num: Option<u32>,
        /// Send the request to a running daemon instead of calling the index directly.
        #[arg(long)]
        daemon: bool,
    },
    /// Synthesize insights from a JSON insight request.
    Synthesize {
        /// File holding `{projectName, projectPain?, signals: [...]}`.
        #[arg(long, short, value_name = "PATH")]
        file: PathBuf,
        #[arg(long)]
        daemon: bool,
    },
    /// Run the daemon on the configured socket.
    Serve,
    /// Check that the daemon is answering.
    Ping,
    /// Ask the daemon to shut down.
    Stop,
    /// Report which configuration values are present.
    Doctor,
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.telemetry.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_response(response: &ApiResponse) -> Result<()> {
    if !response.is_success() {
        bail!(
            "{} (status {})",
            response.error_message().unwrap_or("request failed"),
            response.status
        );
    }
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(())
}

fn read_request(path: &Path) -> Result<InsightRequest> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid insight request", path.display()))
}

fn presence(value: &str) -> &'static str {
    if value.trim().is_empty() { "missing" } else { "set" }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;
    init_tracing(&config);

    let client = DaemonClient::new(&config.daemon.socket_path);

    match cli.command {
        Commands::Search { query, num, daemon } => {
            let request = SearchRequest {
                query,
                num_results: num,
            };
            let response = if daemon {
                client.search(request).await?
            } else {
                let state = ServiceState::from_config(&config)?;
                handle_search(state.search.as_ref(), &request).await
            };
            print_response(&response)?;
        }
        Commands::Synthesize { file, daemon } => {
            let request = read_request(&file)?;
            let response = if daemon {
                client.synthesize(request).await?
            } else {
                let state = ServiceState::from_config(&config)?;
                handle_insights(&state.synthesis, &request).await
            };
            print_response(&response)?;
        }
        Commands::Serve => {
            run_daemon(&config).await?;
        }
        Commands::Ping => {
            println!("{}", client.ping().await?);
        }
        Commands::Stop => {
            client.graceful_shutdown().await?;
            println!("shutdown requested");
        }
        Commands::Doctor => {
            println!("signalscout doctor");
            println!("- config file: {}", cli.config.display());
            println!("- search endpoint: {}", config.search.endpoint);
            println!("- search api key: {}", presence(&config.search.api_key));
            println!("- search engine id: {}", presence(&config.search.engine_id));
            println!("- model: {}", config.llm.model);
            println!("- model api key: {}", presence(&config.llm.api_key));
            println!("- daemon socket: {}", config.daemon.socket_path);
            match client.ping().await {
                Ok(_) => println!("- daemon: running"),
                Err(_) => println!("- daemon: not running"),
            }
        }
    }

    Ok(())
}
