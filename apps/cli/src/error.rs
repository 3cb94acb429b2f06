use thiserror::Error;

/// Errors raised by the split patient store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("malformed medical document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("personal field(s) {} found in anonymized medical data", .0.join(", "))]
    PrivacyViolation(Vec<String>),
    #[error("no record for patient {0}")]
    NotFound(String),
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
    #[error("`{field}` is not a number: {value}")]
    InvalidField { field: &'static str, value: String },
    #[error("medical store is not configured, running in local-only mode")]
    RemoteUnavailable,
}
