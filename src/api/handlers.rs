//! HTTP request handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use crate::access::AccessDecision;
use crate::api::types::*;
use crate::auth::Claims;
use crate::error::{GatewayError, GatewayResult};
use crate::AppState;

// ==================== Authentication Endpoints ====================

/// Login to obtain a bearer token.
///
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> GatewayResult<Json<LoginResponse>> {
    // An unreadable body is indistinguishable from bad credentials.
    let Json(request) = payload.map_err(|e| {
        tracing::debug!(error = %e, "Unreadable login body");
        GatewayError::InvalidCredentials
    })?;

    let (Some(username), Some(password)) = (request.username, request.password) else {
        tracing::warn!("Failed login attempt: missing username or password");
        return Err(GatewayError::InvalidCredentials);
    };

    let subject = state
        .credentials
        .authenticate(&username, &password)
        .ok_or_else(|| {
            tracing::warn!(username = %username, "Failed login attempt");
            GatewayError::InvalidCredentials
        })?;

    let access_token = state.jwt_manager.generate_token(subject)?;

    tracing::info!(
        username = %subject,
        ttl_secs = state.jwt_manager.token_ttl_secs(),
        "User logged in"
    );

    Ok(Json(LoginResponse { access_token }))
}

// ==================== Record Endpoints ====================

/// Fetch a medical record by id.
///
/// GET /api/historiales/{id}
///
/// Under the default `no_ownership_check` policy any valid token reads any
/// record. That is the IDOR this service exists to demonstrate.
#[utoipa::path(
    get,
    path = "/api/historiales/{id}",
    params(
        ("id" = i64, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Record found", body = RecordResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse),
        (status = 403, description = "Denied by the owner_only policy", body = crate::error::ErrorResponse),
        (status = 404, description = "Record not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "records"
)]
pub async fn get_record(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    raw_id: Result<Path<String>, PathRejection>,
) -> GatewayResult<Json<RecordResponse>> {
    let Path(raw_id) = raw_id.map_err(|e| GatewayError::NotFound(e.body_text()))?;

    // Anything but a plain digit run behaves like a route miss.
    let id = parse_record_id(&raw_id).ok_or_else(|| {
        tracing::debug!(raw_id = %raw_id, "Non-numeric record id");
        GatewayError::NotFound(format!("record {}", raw_id))
    })?;

    let record = state
        .records
        .get(id)
        .ok_or_else(|| GatewayError::NotFound(format!("record {}", id)))?;

    // The only authorization point between a valid token and the record.
    if state.policy.check(&claims.sub, record) == AccessDecision::Deny {
        tracing::warn!(
            subject = %claims.sub,
            record_id = id,
            policy = state.policy.name(),
            "Record access denied"
        );
        return Err(GatewayError::Forbidden {
            subject: claims.sub,
            record_id: id,
        });
    }

    tracing::info!(
        subject = %claims.sub,
        record_id = id,
        policy = state.policy.name(),
        "Record served"
    );

    Ok(Json(RecordResponse::from(record)))
}

/// Parse an id made only of ASCII digits. Signs, spaces and empty input are rejected.
fn parse_record_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        policy: state.policy.name().to_string(),
        records: state.records.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_id_digits_only() {
        assert_eq!(parse_record_id("101"), Some(101));
        assert_eq!(parse_record_id("0007"), Some(7));
        assert_eq!(parse_record_id("+101"), None);
        assert_eq!(parse_record_id("-101"), None);
        assert_eq!(parse_record_id(" 101"), None);
        assert_eq!(parse_record_id("abc"), None);
        assert_eq!(parse_record_id(""), None);
        assert_eq!(parse_record_id("99999999999999999999"), None);
    }
}
