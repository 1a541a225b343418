//! Historial Gateway - medical-record lookup API.
//!
//! Issues bearer tokens on login and serves records by sequential id. The
//! default access policy performs no ownership check, which makes the
//! service a working Insecure Direct Object Reference demonstration.

use std::sync::Arc;

use tokio::net::TcpListener;

mod access;
mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;

use crate::access::{AccessPolicyKind, RecordAccessPolicy};
use crate::api::build_router;
use crate::auth::{CredentialStore, JwtManager};
use crate::config::Config;
use crate::domain::RecordTable;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// Static credential table.
    pub credentials: CredentialStore,
    /// Static record table.
    pub records: RecordTable,
    /// The single authorization point for record reads.
    pub policy: Arc<dyn RecordAccessPolicy>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Logging format is itself configurable, so configuration comes first
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    logging::init(config.logging.format);

    tracing::info!("Starting Historial Gateway v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        policy = %config.access.policy,
        token_ttl_secs = config.auth.token_ttl_secs,
        "Configuration loaded"
    );

    tracing::info!(
        server = %config.database.server,
        database = %config.database.name,
        "Database settings present but unused; serving in-memory fixtures"
    );

    let records = RecordTable::new(config.records.clone()).map_err(|e| {
        tracing::error!(error = %e, "Failed to load record table");
        anyhow::anyhow!("Record table error: {}", e)
    })?;
    let credentials = CredentialStore::new(config.auth.users.clone()).map_err(|e| {
        tracing::error!(error = %e, "Failed to load credential table");
        anyhow::anyhow!("Credential table error: {}", e)
    })?;

    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_ttl_secs,
    );

    if config.access.policy == AccessPolicyKind::NoOwnershipCheck {
        tracing::warn!("Record access has NO ownership check - any valid token reads any record");
    }
    let policy = config.access.policy.build();

    tracing::info!(
        users = credentials.len(),
        records = ?records.ids(),
        "Static tables loaded"
    );

    let state = AppState {
        jwt_manager,
        credentials,
        records,
        policy,
    };

    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
