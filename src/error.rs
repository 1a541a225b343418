//! Error types for the historial gateway.
//!
//! Every failure a client can see maps to a status code and a flat
//! `{"msg": ...}` body with no further detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const MSG_INVALID_CREDENTIALS: &str = "Credenciales inválidas";
pub const MSG_INVALID_TOKEN: &str = "Token inválido o ausente";
pub const MSG_RECORD_NOT_FOUND: &str = "Historial no encontrado";
pub const MSG_FORBIDDEN: &str = "Acceso denegado";
pub const MSG_INTERNAL: &str = "Error interno";

/// Unified error type for gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Username unknown, password mismatch, or an unreadable login body.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, malformed, badly signed, or expired.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Only produced when an ownership-enforcing policy is active.
    #[error("subject {subject} may not read record {record_id}")]
    Forbidden { subject: String, record_id: i64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Error response body for API clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub msg: String,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidCredentials | GatewayError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Forbidden { .. } => StatusCode::FORBIDDEN,
            GatewayError::Config(_) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let msg = match &self {
            GatewayError::InvalidCredentials => MSG_INVALID_CREDENTIALS,
            GatewayError::Unauthorized(reason) => {
                // The reason stays server-side; clients get one flat message.
                tracing::debug!(reason = %reason, "Rejected bearer token");
                MSG_INVALID_TOKEN
            }
            GatewayError::NotFound(_) => MSG_RECORD_NOT_FOUND,
            GatewayError::Forbidden { .. } => MSG_FORBIDDEN,
            GatewayError::Config(e) | GatewayError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                MSG_INTERNAL
            }
        };

        let body = ErrorResponse {
            msg: msg.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::Unauthorized("expired".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::NotFound("record 999".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::Forbidden {
                subject: "doctor".into(),
                record_id: 101
            }
            .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GatewayError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
