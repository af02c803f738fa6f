//! Axum server and routes.

use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{Path, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use consent_types::{ConsentCreateRequest, ConsentResponse, ConsentService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const X_FAPI_FINANCIAL_ID: &str = "x-fapi-financial-id";
pub const X_FAPI_INTERACTION_ID: &str = "x-fapi-interaction-id";

pub struct AppState {
    pub service: Arc<dyn ConsentService + Send + Sync>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/account-access-consents", post(handle_create))
        .route(
            "/account-access-consents/:consent_id",
            get(handle_get).delete(handle_delete),
        )
        .layer(middleware::from_fn(interaction_id))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Echoes `x-fapi-interaction-id`, or mints one, on every consent response.
async fn interaction_id(req: Request, next: Next) -> Response {
    let id = match req.headers().get(X_FAPI_INTERACTION_ID) {
        Some(v) => Some(v.clone()),
        None => HeaderValue::from_str(&Uuid::new_v4().to_string()).ok(),
    };
    let mut res = next.run(req).await;
    if let Some(id) = id {
        res.headers_mut().insert(X_FAPI_INTERACTION_ID, id);
    }
    res
}

fn require_financial_id(headers: &HeaderMap) -> Result<(), ApiError> {
    match headers.get(X_FAPI_FINANCIAL_ID) {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ApiError::BadRequest(format!(
            "{} header is required.",
            X_FAPI_FINANCIAL_ID
        ))),
    }
}

/// Decodes the create body. An empty body or JSON `null` is a request without a body,
/// which the validator reports; anything else that fails to decode is rejected here.
fn decode_create_body(body: &[u8]) -> Result<Option<ConsentCreateRequest>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    ConsentCreateRequest::from_json_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Malformed request body: {}", e)))
}

async fn handle_create(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<ConsentResponse>), ApiError> {
    let req = decode_create_body(&body)?;
    let created = state.service.create_consent(req.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn handle_get(
    State(state): State<Arc<AppState>>,
    Path(consent_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ConsentResponse>, ApiError> {
    require_financial_id(&headers)?;
    let consent = state.service.get_consent_by_id(&consent_id).await?;
    Ok(Json(consent))
}

async fn handle_delete(
    State(state): State<Arc<AppState>>,
    Path(consent_id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_financial_id(&headers)?;
    state.service.delete_consent_by_id(&consent_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn handle_health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_body_decodes_to_none() {
        assert!(decode_create_body(b"").unwrap().is_none());
        assert!(decode_create_body(b" \n").unwrap().is_none());
        assert!(decode_create_body(b"null").unwrap().is_none());
    }

    #[test]
    fn decoded_body_keeps_received_text() {
        let body = br#"{"Data":{"Permissions":["ReadBalances"],"TransactionToDateTime":"2025-01-01T00:00:00.000Z"}}"#;
        let req = decode_create_body(body).unwrap().unwrap();
        assert_eq!(req.raw.as_deref().map(str::as_bytes), Some(&body[..]));
    }

    #[test]
    fn garbage_body_is_bad_request() {
        let err = decode_create_body(b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn financial_id_must_be_present_and_non_empty() {
        let mut headers = HeaderMap::new();
        assert!(require_financial_id(&headers).is_err());
        headers.insert(X_FAPI_FINANCIAL_ID, HeaderValue::from_static(""));
        assert!(require_financial_id(&headers).is_err());
        headers.insert(X_FAPI_FINANCIAL_ID, HeaderValue::from_static("0015800001041RHAAY"));
        assert!(require_financial_id(&headers).is_ok());
    }
}
