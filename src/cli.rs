use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::{info, warn};
use playlist_librarian::LibrarianServer;
use playlist_librarian::clients::errors::{Error, Result};
use playlist_librarian::clients::spotify::AuthFailure;
use playlist_librarian::clients::{Catalog, SpotifyClientManager};
use playlist_librarian::config::{Config, ConfigBuilder};
use rmcp::ServiceExt;
use rmcp::transport::stdio;

#[derive(Parser)]
#[command(name = "playlist-librarian")]
#[command(version, about = "Spotify playlist and track metadata tools over MCP", long_about = None)]
struct Cli {
    /// Read Spotify credentials from this dotenv file instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP tools over stdio (default)
    Serve {},
    /// Authenticate and run a test request, then exit
    Check {},
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = ConfigBuilder::new();
    if let Some(path) = cli.env_file {
        builder = builder.env_file(path);
    }
    info!("Initializing Spotify client...");
    let config = builder.build()?;

    match cli.command.unwrap_or(Commands::Serve {}) {
        Commands::Serve {} => serve(config).await,
        Commands::Check {} => check(config).await,
    }
}

async fn authenticate(config: Config) -> Result<SpotifyClientManager> {
    let mut manager = SpotifyClientManager::new(config.credentials, config.endpoints);
    if manager.authenticate().await {
        return Ok(manager);
    }
    let failure = manager
        .last_failure()
        .cloned()
        .unwrap_or_else(|| AuthFailure::Other("no session".into()));
    Err(Error::AuthenticationFailed(failure))
}

async fn serve(config: Config) -> Result<()> {
    let manager = authenticate(config).await?;
    if manager.test_connection().await? {
        info!("Spotify client initialized and tested successfully");
    } else {
        warn!("Spotify client authenticated but connection test failed");
    }
    let catalog: Arc<dyn Catalog> = Arc::new(manager.get_client()?);

    info!("Starting MCP server...");
    let service = LibrarianServer::new(Some(catalog))
        .serve(stdio())
        .await
        .map_err(|e| Error::ServerError(e.to_string()))?;
    service
        .waiting()
        .await
        .map_err(|e| Error::ServerError(e.to_string()))?;
    info!("MCP client disconnected, shutting down");
    Ok(())
}

async fn check(config: Config) -> Result<()> {
    let manager = authenticate(config).await?;
    if manager.test_connection().await? {
        println!("Spotify credentials OK");
        Ok(())
    } else {
        Err(Error::ConnectionTestFailed)
    }
}
