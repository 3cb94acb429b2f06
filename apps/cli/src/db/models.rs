use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::error::StoreError;

pub const ANONYMOUS_DATA_TYPE: &str = "anonymous_medical_only";

/// Personal half of a patient, kept in the local store only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PatientRecord {
    pub id: i64,
    pub uuid: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub created_at: String,
}

/// Form input for a new patient. Age and height stay raw until the medical
/// document is built.
#[derive(Debug, Clone, Default)]
pub struct NewPatient {
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub age: String,
    pub height: String,
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), StoreError> {
        for (field, value) in [
            ("full_name", &self.full_name),
            ("phone", &self.phone),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(StoreError::MissingField(field));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalHistory {
    pub placeholder: bool,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSigns {
    pub last_bp: Option<f64>,
    pub last_glucose: Option<f64>,
    pub last_weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub current_risk_score: Option<f64>,
    pub last_assessment: Option<String>,
    pub risk_factors: Vec<String>,
}

/// Anonymized half of a patient, the only thing the medical store holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalDocument {
    pub uuid: String,
    pub age: Option<i64>,
    pub height: Option<f64>,
    pub medical_history: MedicalHistory,
    pub vital_signs: VitalSigns,
    pub risk_metrics: RiskMetrics,
    pub created_at: String,
    pub last_updated: String,
    pub data_type: String,
    pub contains_personal_data: bool,
}

impl MedicalDocument {
    pub fn new(uuid: &str, age: Option<i64>, height: Option<f64>, now: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
            age,
            height,
            medical_history: MedicalHistory {
                placeholder: true,
                note: "Medical history will be added here".to_string(),
            },
            vital_signs: VitalSigns::default(),
            risk_metrics: RiskMetrics::default(),
            created_at: now.to_string(),
            last_updated: now.to_string(),
            data_type: ANONYMOUS_DATA_TYPE.to_string(),
            contains_personal_data: false,
        }
    }
}

/// Ages are only recorded when given as plain digits.
pub fn parse_age(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Blank means unknown; anything else must be a number.
pub fn parse_height(raw: &str) -> Result<Option<f64>, StoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|height| height.is_finite())
        .map(Some)
        .ok_or_else(|| StoreError::InvalidField {
            field: "height",
            value: raw.to_string(),
        })
}

/// One row of the anonymized dashboard listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub uuid: String,
    pub age: Option<i64>,
    pub height: Option<f64>,
    pub created_at: Option<String>,
    pub risk_score: Option<f64>,
}

impl DashboardRow {
    /// Reads loosely so that hand-edited documents still list.
    pub fn from_document(document: &Value) -> Self {
        Self {
            uuid: document
                .get("uuid")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            age: document.get("age").and_then(Value::as_i64),
            height: document.get("height").and_then(Value::as_f64),
            created_at: document
                .get("created_at")
                .and_then(Value::as_str)
                .map(str::to_string),
            risk_score: document
                .pointer("/risk_metrics/current_risk_score")
                .and_then(Value::as_f64),
        }
    }
}

/// Anonymized record as shown on the detail screen.
#[derive(Debug, Clone, Serialize)]
pub struct PatientDetail {
    pub document: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    pub uuid: String,
    pub medical_saved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub personal_removed: bool,
    pub medical_removed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_requires_plain_digits() {
        assert_eq!(parse_age("34"), Some(34));
        assert_eq!(parse_age(" 7 "), Some(7));
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("-3"), None);
        assert_eq!(parse_age("3.5"), None);
        assert_eq!(parse_age("thirty"), None);
    }

    #[test]
    fn height_must_be_numeric_when_present() {
        assert_eq!(parse_height("").unwrap(), None);
        assert_eq!(parse_height("162.5").unwrap(), Some(162.5));
        assert!(matches!(
            parse_height("tall"),
            Err(StoreError::InvalidField { field: "height", .. })
        ));
        assert!(parse_height("NaN").is_err());
    }

    #[test]
    fn missing_personal_fields_are_rejected() {
        let patient = NewPatient {
            full_name: "Ada Example".into(),
            phone: "  ".into(),
            email: "ada@example.org".into(),
            ..NewPatient::default()
        };
        assert!(matches!(
            patient.validate(),
            Err(StoreError::MissingField("phone"))
        ));
    }

    #[test]
    fn new_document_is_marked_anonymous() {
        let document = MedicalDocument::new("abc", Some(30), None, "2025-01-01T00:00:00Z");
        assert_eq!(document.data_type, ANONYMOUS_DATA_TYPE);
        assert!(!document.contains_personal_data);
        assert_eq!(document.created_at, document.last_updated);
        assert!(document.risk_metrics.risk_factors.is_empty());
    }

    #[test]
    fn dashboard_row_reads_nested_risk_score() {
        let document = serde_json::json!({
            "uuid": "abc",
            "age": 41,
            "risk_metrics": { "current_risk_score": 27.0 }
        });
        let row = DashboardRow::from_document(&document);
        assert_eq!(row.uuid, "abc");
        assert_eq!(row.age, Some(41));
        assert_eq!(row.height, None);
        assert_eq!(row.risk_score, Some(27.0));
    }
}
