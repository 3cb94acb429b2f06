use serde_json::Value;

use crate::error::StoreError;

/// Keys that identify a person and must never reach the medical store.
pub const PERSONAL_FIELDS: [&str; 6] = ["full_name", "name", "phone", "email", "contact", "address"];

/// Fragments that mark a column as medical. The personal table must have none.
pub const MEDICAL_COLUMN_MARKERS: [&str; 8] = [
    "age", "height", "medical", "risk", "blood", "glucose", "weight", "bmi",
];

/// Top-level keys a medical document is expected to carry at least one of.
pub const MEDICAL_FIELDS: [&str; 5] = [
    "age",
    "height",
    "medical_history",
    "vital_signs",
    "risk_metrics",
];

/// Paths of every personal key, at any nesting depth.
pub fn personal_fields_in(value: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_personal(value, "", &mut found);
    found
}

fn collect_personal(value: &Value, prefix: &str, found: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                if PERSONAL_FIELDS.contains(&key.as_str()) {
                    found.push(path.clone());
                }
                collect_personal(child, &path, found);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_personal(child, &format!("{prefix}[{index}]"), found);
            }
        }
        _ => {}
    }
}

pub fn verify_no_personal_data(value: &Value) -> Result<(), StoreError> {
    let found = personal_fields_in(value);
    if found.is_empty() {
        return Ok(());
    }
    log::error!("privacy violation: personal field(s) {found:?} in medical data");
    Err(StoreError::PrivacyViolation(found))
}

pub fn is_medical_column(column: &str) -> bool {
    let column = column.to_lowercase();
    MEDICAL_COLUMN_MARKERS
        .iter()
        .any(|marker| column.contains(marker))
}

pub fn has_medical_fields(document: &Value) -> bool {
    MEDICAL_FIELDS
        .iter()
        .any(|field| document.get(field).is_some())
}

/// Linking ids are hyphenated UUIDs, 36 characters long.
pub fn is_well_formed_uuid(candidate: &str) -> bool {
    candidate.len() == 36 && uuid::Uuid::parse_str(candidate).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_document_passes() {
        let document = json!({
            "uuid": "0b6c1f0e-3f57-4b8e-9a53-0d9f6f5c2a11",
            "age": 30,
            "risk_metrics": { "risk_factors": ["smoking"] }
        });
        assert!(verify_no_personal_data(&document).is_ok());
    }

    #[test]
    fn nested_personal_fields_are_found() {
        let document = json!({
            "uuid": "x",
            "email": "a@b.c",
            "medical_history": { "contact": { "phone": "555" } },
            "visits": [ { "address": "1 Main St" } ]
        });
        let mut found = personal_fields_in(&document);
        found.sort();
        assert_eq!(
            found,
            vec![
                "email",
                "medical_history.contact",
                "medical_history.contact.phone",
                "visits[0].address",
            ]
        );
        assert!(matches!(
            verify_no_personal_data(&document),
            Err(StoreError::PrivacyViolation(fields)) if fields.len() == 4
        ));
    }

    #[test]
    fn medical_columns_match_by_fragment() {
        assert!(is_medical_column("patient_age"));
        assert!(is_medical_column("BloodType"));
        assert!(is_medical_column("bmi"));
        assert!(!is_medical_column("full_name"));
        assert!(!is_medical_column("created_at"));
    }

    #[test]
    fn uuid_format_check() {
        assert!(is_well_formed_uuid("0b6c1f0e-3f57-4b8e-9a53-0d9f6f5c2a11"));
        assert!(!is_well_formed_uuid("0b6c1f0e3f574b8e9a530d9f6f5c2a11"));
        assert!(!is_well_formed_uuid("not-a-uuid"));
    }
}
