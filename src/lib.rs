//! Project Showcase
//!
//! Backend for a project showcase site:
//! - Neo4j graph of users, projects, likes and comments
//! - Password accounts (bcrypt, with legacy SHA-256 digests accepted)
//! - JSON HTTP API consumed by the web client

pub mod api;
pub mod auth;
pub mod neo4j;
pub mod seed;

#[cfg(test)]
pub(crate) mod test_helpers;

use anyhow::{Context, Result};
use neo4j::{ConnectOptions, LikeMode, Neo4jClient};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

// ============================================================================
// YAML config structs (deserialization targets)
// ============================================================================

/// Top-level YAML configuration file structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: ServerYamlConfig,
    pub neo4j: Neo4jYamlConfig,
    pub likes: LikesYamlConfig,
    pub seed: SeedYamlConfig,
    pub auth: AuthYamlConfig,
}

/// Server configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerYamlConfig {
    pub port: u16,
}

impl Default for ServerYamlConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Neo4j configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Neo4jYamlConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

impl Default for Neo4jYamlConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".into(),
            user: "neo4j".into(),
            password: "password".into(),
            max_connections: 16,
            fetch_size: 200,
        }
    }
}

/// Like semantics section
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LikesYamlConfig {
    /// `single` (one LIKES edge per user and project) or `multi`
    pub mode: LikeMode,
}

/// Bootstrap section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedYamlConfig {
    /// Create the demo accounts on startup when the store has no users
    pub demo_users: bool,
}

impl Default for SeedYamlConfig {
    fn default() -> Self {
        Self { demo_users: true }
    }
}

/// Password hashing section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthYamlConfig {
    pub bcrypt_cost: u32,
}

impl Default for AuthYamlConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: auth::password::BCRYPT_COST,
        }
    }
}

// ============================================================================
// Runtime config (what the application actually uses)
// ============================================================================

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,
    pub neo4j_max_connections: usize,
    pub neo4j_fetch_size: usize,
    pub server_port: u16,
    pub like_mode: LikeMode,
    pub seed_demo_users: bool,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables only.
    /// Equivalent to from_yaml_and_env(None).
    pub fn from_env() -> Result<Self> {
        Self::from_yaml_and_env(None)
    }

    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries "config.yaml" in CWD. Unparseable env
    /// values are ignored in favour of the YAML value.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let yaml = Self::load_yaml(yaml_path);

        Ok(Self {
            neo4j_uri: std::env::var("NEO4J_URI").unwrap_or(yaml.neo4j.uri),
            neo4j_user: std::env::var("NEO4J_USERNAME").unwrap_or(yaml.neo4j.user),
            neo4j_password: std::env::var("NEO4J_PASSWORD").unwrap_or(yaml.neo4j.password),
            neo4j_max_connections: env_parse("NEO4J_MAX_CONNECTIONS")
                .unwrap_or(yaml.neo4j.max_connections),
            neo4j_fetch_size: yaml.neo4j.fetch_size,
            server_port: env_parse("PORT").unwrap_or(yaml.server.port),
            like_mode: env_parse("LIKE_MODE").unwrap_or(yaml.likes.mode),
            seed_demo_users: std::env::var("SEED_DEMO_USERS")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(yaml.seed.demo_users),
            bcrypt_cost: yaml.auth.bcrypt_cost,
        })
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> YamlConfig {
        let default_path = Path::new("config.yaml");
        let path = yaml_path.unwrap_or(default_path);

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    YamlConfig::default()
                }
            },
            Err(_) => {
                tracing::debug!(
                    "No config file at {}, using env vars / defaults",
                    path.display()
                );
                YamlConfig::default()
            }
        }
    }

    pub fn connect_options(&self) -> ConnectOptions {
        ConnectOptions {
            max_connections: self.neo4j_max_connections,
            fetch_size: self.neo4j_fetch_size,
            ..ConnectOptions::new(&self.neo4j_uri, &self.neo4j_user, &self.neo4j_password)
        }
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Option<T> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Application state and server lifecycle
// ============================================================================

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn neo4j::GraphStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn neo4j::GraphStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Connect to Neo4j and install the schema constraints.
pub async fn connect_store(config: &Config) -> Result<Arc<Neo4jClient>> {
    let client = Arc::new(Neo4jClient::new(config.like_mode));
    client.connect_with(&config.connect_options()).await?;
    client.init_schema().await?;
    Ok(client)
}

/// Run the HTTP server until SIGINT/SIGTERM, then close the store.
pub async fn start_server(config: Config) -> Result<()> {
    let client = connect_store(&config).await?;

    if config.seed_demo_users {
        if let Err(e) = seed::initialize_demo_users(client.as_ref()).await {
            tracing::error!("Demo user bootstrap failed: {:#}", e);
        }
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let state = AppState::new(client.clone(), config);
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Shutting down server...");
    client.close().await;
    Ok(())
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// ============================================================================
// Tests
// ============================================================================
