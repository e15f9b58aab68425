mod audits;

use std::{sync::Arc, time::Duration};

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use workfix_core::{AppConfig, AuditError};
use workfix_instagram::{InstagramClient, SourceError, ThrottlePolicy};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub client: Arc<InstagramClient>,
    /// One throttle for every audit the process runs. Held for the whole
    /// audit so at most one runs at a time.
    pub throttle: Arc<Mutex<ThrottlePolicy>>,
}

impl AppState {
    /// # Errors
    ///
    /// Returns [`SourceError`] if the Instagram client cannot be built.
    pub fn from_config(config: Arc<AppConfig>) -> Result<Self, SourceError> {
        let client = InstagramClient::from_config(&config)?;
        Ok(Self {
            config: config.clone(),
            client: Arc::new(client),
            throttle: Arc::new(Mutex::new(ThrottlePolicy::from_config(&config))),
        })
    }
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
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
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
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "connection_refused" => StatusCode::SERVICE_UNAVAILABLE,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Translate a failed audit into the API error envelope.
///
/// Operator guidance, when the error has one, is appended to the message.
pub(super) fn map_audit_error(request_id: String, error: &AuditError) -> ApiError {
    let code = match error {
        AuditError::InvalidInput(_) => "validation_error",
        AuditError::NotFound { .. } => "not_found",
        AuditError::ConnectionRefused { .. } => "connection_refused",
        AuditError::Upstream(_) => {
            tracing::error!(error = %error, "audit failed upstream");
            "upstream_error"
        }
    };
    let message = match error.guidance() {
        Some(hint) => format!("{error}; {hint}"),
        None => error.to_string(),
    };
    ApiError::new(request_id, code, message)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn audit_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/audits", post(audits::create_audit))
        .route("/api/v1/audits/defaults", get(audits::audit_defaults))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(audit_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Limiter allowing `per_minute` audit-route requests per minute.
pub fn rate_limit_state(per_minute: usize) -> RateLimitState {
    RateLimitState::new(per_minute, Duration::from_secs(60))
}
