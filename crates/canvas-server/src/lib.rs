//! Canvas Server Library
//!
//! Users register, sign in for a bearer token, and keep canvas documents
//! that they may share with other registered users by email.

pub mod canvas;
pub mod core;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::canvas::CanvasRepository;
use crate::core::auth::token::TokenService;
use crate::core::auth::CredentialStore;
use crate::core::store::Database;
use crate::core::{AppState, ServerConfig};

/// Open the store and wire every service into one [`AppState`].
pub async fn build_state(config: ServerConfig) -> anyhow::Result<AppState> {
    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    )?);
    info!("Token Service initialized (ttl {:?})", config.token_ttl);

    let db = Database::connect(&config).await?;

    let credentials = Arc::new(CredentialStore::new(db.clone(), config.hash_cost));
    info!("Credential Store initialized");

    let canvases = Arc::new(CanvasRepository::new(db, credentials.clone()));
    info!("Canvas Repository initialized");

    Ok(AppState {
        config,
        credentials,
        tokens,
        canvases,
    })
}

/// Full application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    crate::core::router(state)
        .layer(tower_http::cors::CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    info!("=== Canvas Server ===");

    let config = ServerConfig::from_env()?;
    info!("Storage directory: {:?}", config.data_dir);

    let port = config.port;
    let state = build_state(config).await?;
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Canvas Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
