//! Access policy engine - decides whether a subject may read a record.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::MedicalRecord;

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny,
}

/// Trait for record access policy implementations.
pub trait RecordAccessPolicy: Send + Sync {
    /// Stable identifier, surfaced in logs and the health endpoint.
    fn name(&self) -> &'static str;

    /// Decide whether `subject` may read `record`.
    fn check(&self, subject: &str, record: &MedicalRecord) -> AccessDecision;
}

/// The vulnerable policy: a valid token is the only requirement.
///
/// There is no ownership check here. Any subject reads any record whose id
/// it can guess.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOwnershipCheck;

impl RecordAccessPolicy for NoOwnershipCheck {
    fn name(&self) -> &'static str {
        "no_ownership_check"
    }

    fn check(&self, _subject: &str, _record: &MedicalRecord) -> AccessDecision {
        AccessDecision::Allow
    }
}

/// The secure variant: the subject must be listed in `assigned_to`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerOnly;

impl RecordAccessPolicy for OwnerOnly {
    fn name(&self) -> &'static str {
        "owner_only"
    }

    fn check(&self, subject: &str, record: &MedicalRecord) -> AccessDecision {
        if record.is_assigned_to(subject) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }
}

/// Policy selection as it appears in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessPolicyKind {
    #[default]
    NoOwnershipCheck,
    OwnerOnly,
}

impl AccessPolicyKind {
    pub fn build(self) -> Arc<dyn RecordAccessPolicy> {
        match self {
            AccessPolicyKind::NoOwnershipCheck => Arc::new(NoOwnershipCheck),
            AccessPolicyKind::OwnerOnly => Arc::new(OwnerOnly),
        }
    }
}

impl fmt::Display for AccessPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessPolicyKind::NoOwnershipCheck => f.write_str("no_ownership_check"),
            AccessPolicyKind::OwnerOnly => f.write_str("owner_only"),
        }
    }
}
