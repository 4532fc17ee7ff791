use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ethers_core::types::Address;
use serde::{Deserialize, Serialize};

use crate::error::GasError;
use crate::models::GasStats;
use crate::presenter::{Presenter, View};
use crate::service::{GasService, StatsSource};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<GasService>,
    pub presenter: Presenter<GasService>,
}

impl AppState {
    pub fn new(service: GasService, loading_floor: std::time::Duration) -> Self {
        let service = Arc::new(service);
        let presenter = Presenter::new(Arc::clone(&service), loading_floor);
        Self { service, presenter }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WalletRequest {
    pub address: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

enum ApiError {
    BadAddress(String),
    Upstream(GasError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadAddress(raw) => {
                (StatusCode::BAD_REQUEST, format!("invalid address: {raw}"))
            }
            ApiError::Upstream(err) => {
                tracing::warn!("stats request failed: {}", err);
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadAddress(raw.to_string()))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn current_view(State(state): State<AppState>) -> Json<View> {
    Json(state.presenter.view())
}

async fn connect_wallet(
    State(state): State<AppState>,
    Json(req): Json<WalletRequest>,
) -> Result<(StatusCode, Json<View>), ApiError> {
    let address = parse_address(&req.address)?;
    state.presenter.connect(address, req.active);
    Ok((StatusCode::ACCEPTED, Json(state.presenter.view())))
}

async fn disconnect_wallet(State(state): State<AppState>) -> Json<View> {
    state.presenter.disconnect();
    Json(state.presenter.view())
}

async fn gas_stats(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<GasStats>, ApiError> {
    let address = parse_address(&raw)?;
    let stats = state
        .service
        .gas_stats(address)
        .await
        .map_err(ApiError::Upstream)?;
    Ok(Json(stats))
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/view", get(current_view))
        .route("/wallet", axum::routing::put(connect_wallet).delete(disconnect_wallet))
        .route("/stats/:address", get(gas_stats))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
