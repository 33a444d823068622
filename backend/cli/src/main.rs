mod app;
mod status_cmd;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use rsvp_config::defaults::DEFAULT_PORT;
use rsvp_config::{load_dotenv, prepare, redact, Config};

#[derive(Parser)]
#[command(name = "rsvp")]
#[command(about = "RSVP submission service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check whether a local server is answering
    Status {
        /// Port the server listens on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = load_dotenv()?;

    match cli.command {
        Commands::Serve { port } => {
            let mut config = Config::from_env()?;
            if let Some(port) = port {
                config.server.port = port;
            }
            logging::init_logger(
                &config.logging.level,
                config.logging.json,
                config.logging.dir.as_deref(),
            );
            if let Some(path) = dotenv {
                info!(path = %path.display(), "Loaded environment file");
            }
            run_server(config).await
        }
        Commands::Status { port } => {
            let port = port
                .or_else(|| Config::from_env().ok().map(|c| c.server.port))
                .unwrap_or(DEFAULT_PORT);
            status_cmd::run(port).await
        }
    }
}

async fn run_server(config: Config) -> Result<()> {
    let config = prepare(config)?;
    info!(config = %redact(&config), "Starting RSVP service");

    let state = app::build_state(&config).await?;
    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    rsvp_gateway::serve(listener, state, config.server.request_timeout()).await
}
