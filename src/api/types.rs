//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::MedicalRecord;

// ==================== Authentication ====================

/// Login request. Missing fields are treated as bad credentials.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token, valid for one hour by default.
    pub access_token: String,
}

// ==================== Records ====================

/// A medical record as returned to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    pub id: i64,
    /// Patient name.
    pub paciente: String,
    /// Diagnosis.
    pub diagnostico: String,
    /// Sensitive note, returned in full.
    pub data_extra: String,
}

impl From<&MedicalRecord> for RecordResponse {
    fn from(record: &MedicalRecord) -> Self {
        Self {
            id: record.id,
            paciente: record.patient_name.clone(),
            diagnostico: record.diagnosis.clone(),
            data_extra: record.sensitive_note.clone(),
        }
    }
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Active record access policy.
    pub policy: String,
    /// Number of records loaded.
    pub records: usize,
    /// Timestamp.
    pub timestamp: String,
}
