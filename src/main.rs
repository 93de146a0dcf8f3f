//! Project Showcase - Main Server
//!
//! Accounts, likes and comments for the showcase site, stored in Neo4j.

use anyhow::Result;
use clap::{Parser, Subcommand};
use project_showcase::{neo4j::LikeMode, seed, Config};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "showcase")]
#[command(about = "Project showcase backend")]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// How repeated likes are stored: single or multi
        #[arg(long)]
        like_mode: Option<LikeMode>,

        /// Skip creating the demo accounts
        #[arg(long)]
        no_seed: bool,
    },

    /// Create the demo accounts if the store is empty, then exit
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,project_showcase=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_yaml_and_env(Some(&cli.config))?;

    match cli.command {
        Commands::Serve {
            port,
            like_mode,
            no_seed,
        } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            if let Some(mode) = like_mode {
                config.like_mode = mode;
            }
            if no_seed {
                config.seed_demo_users = false;
            }
            project_showcase::start_server(config).await
        }
        Commands::Seed => run_seed(config).await,
    }
}

async fn run_seed(config: Config) -> Result<()> {
    let client = project_showcase::connect_store(&config).await?;

    let result = seed::initialize_demo_users(client.as_ref()).await;
    client.close().await;

    if result? {
        tracing::info!("Demo accounts created");
    } else {
        tracing::info!("Store already has users, nothing to seed");
    }
    Ok(())
}
