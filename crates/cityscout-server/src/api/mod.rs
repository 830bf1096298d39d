mod cities;
mod lookup;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use cityscout_places::{LoadStatus, PlacesError, PlacesFacade, ProviderStatus};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{enforce_provider_quota, request_id, ProviderQuota, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub facade: Arc<PlacesFacade>,
    pub detail_concurrency: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    provider: LoadStatus,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn bad_request(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "provider_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Maps a facade error onto the API error envelope.
///
/// Only the error kind and provider status reach the client; transport
/// details stay in the logs.
pub(super) fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    match error {
        PlacesError::Load(e) => {
            tracing::error!(error = %e, "maps provider unavailable");
            ApiError::new(request_id, "provider_unavailable", "maps provider is not available")
        }
        e if e.provider_status() == Some(&ProviderStatus::InvalidRequest) => {
            tracing::warn!(kind = e.kind(), error = %e, "maps provider rejected request");
            ApiError::bad_request(request_id, format!("{} request was rejected as invalid", e.kind()))
        }
        e if e.is_not_found() => {
            tracing::debug!(kind = e.kind(), error = %e, "lookup found nothing");
            ApiError::new(request_id, "not_found", format!("{} found no results", e.kind()))
        }
        e => {
            tracing::error!(kind = e.kind(), error = %e, "maps lookup failed");
            let message = match e.provider_status() {
                Some(status) => format!("{} failed with provider status {status}", e.kind()),
                None => format!("{} request to maps provider failed", e.kind()),
            };
            ApiError::new(request_id, "upstream_error", message)
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn lookup_router(quota: ProviderQuota) -> Router<AppState> {
    Router::new()
        .route("/api/v1/geocode", get(lookup::geocode))
        .route("/api/v1/places", get(lookup::nearby))
        .route("/api/v1/places/{place_id}", get(lookup::place_detail))
        .route("/api/v1/autocomplete", get(lookup::autocomplete))
        .route("/api/v1/cities/{city}", get(cities::city_page))
        .route_layer(axum::middleware::from_fn_with_state(
            quota,
            enforce_provider_quota,
        ))
}

pub fn build_app(state: AppState, quota: ProviderQuota) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(lookup_router(quota))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

/// Reports the provider load state without triggering a load.
async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let provider = state.facade.load_status();
    let (code, status) = match provider {
        LoadStatus::Ready => (StatusCode::OK, "ok"),
        LoadStatus::Loading => (StatusCode::OK, "starting"),
        LoadStatus::NotStarted => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };
    if code != StatusCode::OK {
        tracing::warn!(%provider, "health check: maps provider not loaded");
    }
    (
        code,
        ApiResponse::new(HealthData { status, provider }, req_id.0),
    )
}

/// Per-minute provider budgets for each lookup route.
pub fn default_provider_quota() -> ProviderQuota {
    ProviderQuota::new(Duration::from_secs(60))
        .with_limit("geocode", 60)
        .with_limit("nearby", 60)
        .with_limit("detail", 120)
        .with_limit("autocomplete", 300)
        .with_limit("city_page", 10)
}
