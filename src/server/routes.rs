//! HTTP API routes
//!
//! Defines all REST API endpoints for the server. Planning failures are part
//! of the returned state; only malformed requests get an error status.

use crate::coord::Coordinate;
use crate::error::{Error, PlanningError};
use crate::format::{available_formats, FormatInfo};
use crate::location::OriginEstimate;
use crate::planner::PlanningState;
use crate::server::state::AppState;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/state", get(state_handler))
        .route("/api/search", post(search_handler))
        .route("/api/select", post(select_handler))
        .route("/api/location", get(location_handler))
        .route("/api/location/retry", post(location_retry_handler))
        .route("/api/status", get(status_handler))
        .route("/api/formats", get(formats_handler))
        .fallback_service(static_files)
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Config(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

/// Current planning state
///
/// GET /api/state
async fn state_handler(State(state): State<Arc<AppState>>) -> Json<PlanningState> {
    Json(state.session.state().await)
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Plan a route to a typed place
///
/// POST /api/search
async fn search_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> Json<PlanningState> {
    Json(state.session.search(&req.query).await)
}

/// Map selection request body
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Plan a route to a point picked on the map
///
/// POST /api/select
async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<PlanningState>, ApiError> {
    let point = Coordinate::new(req.lat, req.lng);
    Ok(Json(state.session.select(point).await?))
}

/// Origin response
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub origin: OriginEstimate,
    pub start_label: String,
    /// Set when a retry failed
    pub error: Option<PlanningError>,
    pub message: Option<String>,
}

impl LocationResponse {
    fn new(state: &AppState, error: Option<PlanningError>) -> Self {
        let origin = state.session.tracker().current();
        Self {
            start_label: origin.start_label(&state.config.location.default_label),
            origin,
            message: error.as_ref().map(ToString::to_string),
            error,
        }
    }
}

/// Current origin estimate
///
/// GET /api/location
async fn location_handler(State(state): State<Arc<AppState>>) -> Json<LocationResponse> {
    Json(LocationResponse::new(&state, None))
}

/// Try to get a position fix again
///
/// POST /api/location/retry
async fn location_retry_handler(State(state): State<Arc<AppState>>) -> Json<LocationResponse> {
    let error = state.session.retry_location().await.err();
    Json(LocationResponse::new(&state, error))
}

/// Server status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub location_source: String,
    pub distance_limit_meters: f64,
    pub max_alternatives: usize,
}

/// Get server status
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let limits = state.session.limits();
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        location_source: state.config.location.source.clone(),
        distance_limit_meters: limits.distance_limit_meters,
        max_alternatives: limits.max_alternatives,
    })
}

/// Formats response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}
