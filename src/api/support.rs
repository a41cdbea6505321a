//! Support lookup authorization gate
//!
//! Stateless per request: method check, bearer header check, shared-secret
//! check, then a single store read. Every failed check short-circuits to
//! its terminal response; a lookup miss answers unauthorized rather than
//! not-found so valid identifiers cannot be enumerated.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use constant_time_eq::constant_time_eq;
use serde_json::json;

use super::server::SharedState;

/// All four verbs answer the same read lookup; external integrations
/// depend on this, see DESIGN.md before narrowing it.
const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

pub async fn support_lookup(
    State(state): State<SharedState>,
    Path(support_id): Path<String>,
    method: Method,
    headers: HeaderMap,
) -> Response {
    if !ALLOWED_METHODS.contains(&method) {
        return gate_error(StatusCode::METHOD_NOT_ALLOWED, "Método não permitido");
    }

    let Some(token) = bearer_token(&headers) else {
        return gate_error(StatusCode::UNAUTHORIZED, "Não autorizado");
    };

    let api_key = &state.config.support.api_key;
    // An unset key rejects everything rather than matching an empty bearer.
    if api_key.is_empty() || !constant_time_eq(token.as_bytes(), api_key.as_bytes()) {
        return gate_error(StatusCode::UNAUTHORIZED, "Chave API inválida");
    }

    match state.support.lookup(&support_id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(None) => gate_error(StatusCode::UNAUTHORIZED, "ID de suporte inválido"),
        Err(e) => {
            // Lookup errors collapse into the same unauthorized response
            // as a miss; nothing about the identifier leaks.
            tracing::error!("Support lookup for '{}' failed: {}", support_id, e);
            gate_error(StatusCode::UNAUTHORIZED, "ID de suporte inválido")
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn gate_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
