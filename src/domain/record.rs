//! Medical record domain types.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::{GatewayError, GatewayResult};

/// A patient record. Read-only fixture data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MedicalRecord {
    /// Sequential, guessable identifier used in the request path.
    pub id: i64,
    pub patient_name: String,
    pub diagnosis: String,
    /// The field an IDOR leaks.
    pub sensitive_note: String,
    /// Usernames the record belongs to. Only consulted by ownership-enforcing policies.
    #[serde(default)]
    pub assigned_to: Vec<String>,
}

impl MedicalRecord {
    pub fn new(id: i64, patient_name: &str, diagnosis: &str, sensitive_note: &str) -> Self {
        Self {
            id,
            patient_name: patient_name.to_string(),
            diagnosis: diagnosis.to_string(),
            sensitive_note: sensitive_note.to_string(),
            assigned_to: Vec::new(),
        }
    }

    pub fn assigned_to<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_to = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_assigned_to(&self, username: &str) -> bool {
        self.assigned_to.iter().any(|u| u == username)
    }
}

/// Immutable id-keyed record table, shared across requests.
#[derive(Debug, Clone)]
pub struct RecordTable {
    records: Arc<HashMap<i64, MedicalRecord>>,
}

impl RecordTable {
    /// Build the table, refusing duplicate ids.
    pub fn new(records: Vec<MedicalRecord>) -> GatewayResult<Self> {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            let id = record.id;
            if map.insert(id, record).is_some() {
                return Err(GatewayError::Config(format!("duplicate record id {}", id)));
            }
        }
        Ok(Self {
            records: Arc::new(map),
        })
    }

    pub fn get(&self, id: i64) -> Option<&MedicalRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Record ids in ascending order.
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MedicalRecord> {
        vec![
            MedicalRecord::new(101, "Ana Pérez", "APENDICITIS AGUDA", "Riesgo de fuga")
                .assigned_to(["admin"]),
            MedicalRecord::new(202, "Beto Gómez", "NEUMONÍA BACTERIANA", "Contrato 002"),
        ]
    }

    #[test]
    fn test_lookup_by_id() {
        let table = RecordTable::new(sample()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(101).unwrap().diagnosis, "APENDICITIS AGUDA");
        assert!(table.get(999).is_none());
        assert_eq!(table.ids(), vec![101, 202]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut records = sample();
        records.push(MedicalRecord::new(101, "Dup", "X", "Y"));
        assert!(matches!(
            RecordTable::new(records),
            Err(GatewayError::Config(_))
        ));
    }

    #[test]
    fn test_assignment() {
        let records = sample();
        assert!(records[0].is_assigned_to("admin"));
        assert!(!records[0].is_assigned_to("doctor"));
        assert!(!records[1].is_assigned_to("admin"));
    }
}
