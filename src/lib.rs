//! Jira Service Desk reporting backend for dashboard JSON datasources.

pub mod auth;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod handlers;
pub mod ingest;
pub mod report;
pub mod translator;

use std::sync::Arc;

use jira_api::JiraClient;
use log::{debug, info, warn};

use crate::auth::AuthMode;
use crate::config::ServerConfig;
use crate::error::StartupError;

pub use handlers::router;

/// Fields requested on every search.
const BASE_SEARCH_FIELDS: [&str; 4] = ["created", "updated", "assignee", "worklog"];

/// Settings applied to every report fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportSettings {
    pub organization_field: String,
    pub max_results: u32,
}

impl ReportSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            organization_field: config.organization_field.clone(),
            max_results: config.max_results,
        }
    }

    pub fn search_fields(&self) -> Vec<&str> {
        BASE_SEARCH_FIELDS
            .iter()
            .copied()
            .chain(std::iter::once(self.organization_field.as_str()))
            .collect()
    }
}

/// Shared handler state. Clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub client: JiraClient,
    pub settings: Arc<ReportSettings>,
    pub auth: Arc<AuthMode>,
}

impl AppState {
    pub fn new(client: JiraClient, settings: ReportSettings, auth: AuthMode) -> Self {
        Self {
            client,
            settings: Arc::new(settings),
            auth: Arc::new(auth),
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Loads `.env`, reads the configuration and serves until Ctrl-C.
pub async fn run() -> Result<(), StartupError> {
    // Loaded before the logger so RUST_LOG may come from the file.
    let dotenv = dotenvy::dotenv();

    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();

    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(err) if err.not_found() => debug!("No .env file found"),
        Err(err) => warn!("Ignoring unreadable .env file: {}", err),
    }

    let config = ServerConfig::from_env()?;
    let client = JiraClient::new(config.jira_config()?)?;
    let auth = config.auth_mode();
    info!(
        "Starting JSD report server for {} (auth: {})",
        client.config().base_url,
        auth.name()
    );

    let state = AppState::new(client, ReportSettings::from_config(&config), auth);
    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
