//! HTTP surface: station route, health check, and error mapping.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::assemble::ResponseAssembler;
use crate::config::ServiceConfig;
use crate::error::{FeedError, StationError};
use crate::fetch::FeedClient;
use crate::payload::ResponsePayload;
use crate::stations;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub client: Arc<dyn FeedClient>,
}

impl AppState {
    pub fn new(config: ServiceConfig, client: impl FeedClient + 'static) -> Self {
        Self {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }
}

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = %self.detail, "Request failed");
        } else {
            warn!(status = %self.status, detail = %self.detail, "Request rejected");
        }
        (self.status, Json(self)).into_response()
    }
}

impl From<StationError> for ApiError {
    fn from(e: StationError) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: e.to_string(),
        }
    }
}

impl From<FeedError> for ApiError {
    fn from(e: FeedError) -> Self {
        let status = match e {
            FeedError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            FeedError::Unreachable { .. }
            | FeedError::Transport { .. }
            | FeedError::MalformedPayload(_) => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            detail: e.to_string(),
        }
    }
}

/// GET /station/{station_type_id}/{station_id}
#[tracing::instrument(skip(state, uri), fields(path = %uri.path()))]
async fn station_series(
    State(state): State<AppState>,
    Path((station_type_id, station_id)): Path<(String, String)>,
    uri: Uri,
) -> Result<Json<ResponsePayload>, ApiError> {
    let path = uri.path();
    let station = stations::resolve(&station_type_id, &station_id, path)?;

    let raw = state.client.retrieve(path).await?;
    let payload = ResponseAssembler::new(&state.config).assemble(&raw, station)?;

    info!(
        values = payload.series.values.len(),
        no_data = payload.series.is_no_data(),
        "Station payload assembled"
    );
    Ok(Json(payload))
}

/// GET /health
async fn health_check() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/station/{station_type_id}/{station_id}", get(station_series))
        .with_state(state)
}

/// Serves the router on `addr` until Ctrl-C.
pub async fn run_http_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
