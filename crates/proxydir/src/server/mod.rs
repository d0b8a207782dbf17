//! Handshake web listener
//!
//! One route: `GET /handshake?server_secret=...&client_id=...&sponsor_id=...
//! &client_version=...`. The requester's address comes from the connection,
//! never from a parameter. A request missing the shared secret - or any
//! gate parameter - is answered `404 Not Found` with an empty body, the
//! same as an unknown path, so probes learn nothing about the endpoint.
//!
//! Each valid request takes its own fresh snapshot of the directory; the
//! core does no cross-request caching.

pub mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use proxydir_storage::{DirectoryStore, StoreError};
use serde::Deserialize;
use thiserror::Error;
use tokio::signal;
use tracing::{debug, error, info};

use crate::directory::handshake::{handshake, HandshakeRequest};
use crate::region::{RegionResolver, RegionTableError, TableResolver, UnavailableResolver};
use crate::server::config::{Config, ConfigError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Region table error: {0}")]
    Region(#[from] RegionTableError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state for the handshake route.
pub struct AppState {
    store: DirectoryStore,
    resolver: Box<dyn RegionResolver>,
    web_server_secret: String,
}

impl AppState {
    pub fn new(
        store: DirectoryStore,
        resolver: Box<dyn RegionResolver>,
        web_server_secret: String,
    ) -> Self {
        Self {
            store,
            resolver,
            web_server_secret,
        }
    }
}

/// Query parameters of a handshake request. All optional at the extractor
/// level so that absence maps to 404 instead of a framework error page.
#[derive(Debug, Deserialize)]
struct HandshakeParams {
    server_secret: Option<String>,
    client_id: Option<String>,
    sponsor_id: Option<String>,
    client_version: Option<String>,
}

/// Build the handshake router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/handshake", get(handle_handshake))
        .with_state(state)
}

async fn handle_handshake(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Query(params): Query<HandshakeParams>,
) -> Response {
    let (Some(secret), Some(client_id), Some(client_version)) = (
        params.server_secret,
        params.client_id,
        params.client_version,
    ) else {
        debug!(peer = %peer, "handshake missing required parameter");
        return StatusCode::NOT_FOUND.into_response();
    };
    if secret != state.web_server_secret {
        debug!(peer = %peer, "handshake secret mismatch");
        return StatusCode::NOT_FOUND.into_response();
    }

    let snapshot = match state.store.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "failed to load directory snapshot");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let request = HandshakeRequest {
        client_ip: peer.ip(),
        client_id,
        sponsor_id: params.sponsor_id.unwrap_or_default(),
        client_version,
    };
    let response = handshake(
        &snapshot,
        state.resolver.as_ref(),
        &request,
        Utc::now().naive_utc(),
    );
    debug!(peer = %peer, lines = response.lines().len(), "handshake served");
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        response.into_body(),
    )
        .into_response()
}

/// Run the listener until ctrl-c.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let resolver: Box<dyn RegionResolver> = match &config.region {
        Some(region) => Box::new(TableResolver::from_file(&region.table_path)?),
        None => Box::new(UnavailableResolver),
    };
    let store = DirectoryStore::open(&config.store.path);
    // Fail fast on a corrupt or incompatible store instead of 500ing later.
    store.snapshot()?;

    let state = Arc::new(AppState::new(
        store,
        resolver,
        config.server.web_server_secret.clone(),
    ));
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    info!(bind_address = %config.server.bind_address, "handshake server listening");
    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    info!("handshake server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
