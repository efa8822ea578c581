//! MCP Server Entry Point
//!
//! Initializes logging, loads configuration, and starts the server with the
//! configured transport. Exits with status 1 when the API key is missing.

use anyhow::Result;
use clap::Parser;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use unifuncs_mcp_server::core::{
    Config, McpServer, TransportService,
    config::LoggingConfig,
    transport::TransportConfig,
};

/// UniFuncs web search and web reader as MCP tools.
#[derive(Debug, Parser)]
#[command(name = "unifuncs_mcp_server", version, about)]
struct Cli {
    /// Serve over HTTP with server-sent events instead of stdio.
    #[arg(long)]
    sse: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_logging(&LoggingConfig::from_env().level);

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    config.transport = TransportConfig::resolve(cli.sse);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let server = McpServer::new(config.clone())?;

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr; stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
