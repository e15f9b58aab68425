use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use workfix_audit::{run_live_audit, run_mock_audit};
use workfix_core::{
    AuditError, AuditMode, AuditRequest, AuditSession, MAX_OFFER_PRICE, MIN_OFFER_PRICE,
    OFFER_PRICE_STEP,
};
use crate::middleware::RequestId;

use super::{map_audit_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CreateAuditRequest {
    pub handle: String,
    pub offer_price: i64,
    #[serde(default)]
    pub mode: AuditMode,
}

/// Values for pre-filling the audit form.
#[derive(Debug, Serialize)]
pub(super) struct AuditDefaults {
    pub handle: String,
    pub offer_price: u64,
    pub min_offer_price: u64,
    pub max_offer_price: u64,
    pub offer_price_step: u64,
}

/// GET /api/v1/audits/defaults
pub(super) async fn audit_defaults(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<AuditDefaults>> {
    Json(ApiResponse {
        data: AuditDefaults {
            handle: state.config.default_handle.to_string(),
            offer_price: state.config.default_offer_price.get(),
            min_offer_price: MIN_OFFER_PRICE,
            max_offer_price: MAX_OFFER_PRICE,
            offer_price_step: OFFER_PRICE_STEP,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

fn mock_session(request: &AuditRequest) -> Result<AuditSession, AuditError> {
    run_mock_audit(rand::rng(), request, Utc::now().date_naive())
}

/// POST /api/v1/audits: run one audit and return the fresh session.
///
/// Audits are serialized through the state's shared throttle; a request
/// arriving while another audit runs waits for it to finish.
pub(super) async fn create_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CreateAuditRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AuditSession>>, ApiError> {
    let rid = req_id.0;

    let Json(body) =
        body.map_err(|e| ApiError::new(rid.as_str(), "validation_error", e.body_text()))?;
    let request = AuditRequest::from_raw(&body.handle, body.offer_price)
        .map_err(|e| map_audit_error(rid.clone(), &e))?;

    let mut throttle = state.throttle.lock().await;
    tracing::info!(
        request_id = %rid,
        handle = %request.handle,
        mode = %body.mode,
        "audit requested"
    );

    let result = match body.mode {
        AuditMode::Mock => mock_session(&request),
        AuditMode::Live => run_live_audit(state.client.as_ref(), &mut *throttle, &request).await,
    };
    let session = result.map_err(|e| map_audit_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: session,
        meta: ResponseMeta::new(rid),
    }))
}
