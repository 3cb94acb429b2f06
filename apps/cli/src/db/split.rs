//! Patient records split across two stores.
//!
//! Personal fields live in the local `patients` table; the anonymized medical
//! document lives in `patients_medical`. The uuid is the only value the two
//! have in common.

use std::collections::BTreeSet;

use chrono::Local;
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::db::models::{
    parse_age, parse_height, AddOutcome, DashboardRow, DeleteOutcome, MedicalDocument,
    NewPatient, PatientDetail, PatientRecord,
};
use crate::db::privacy::{
    has_medical_fields, is_medical_column, is_well_formed_uuid, personal_fields_in,
    verify_no_personal_data, PERSONAL_FIELDS,
};
use crate::db::queries;
use crate::error::StoreError;

pub const SECURITY_WARNING: &str = "Personal data detected in medical records!";

#[derive(Debug, Clone)]
pub struct SplitStore {
    local: SqlitePool,
    remote: Option<SqlitePool>,
}

impl SplitStore {
    pub const fn new(local: SqlitePool, remote: Option<SqlitePool>) -> Self {
        Self { local, remote }
    }

    pub const fn is_local_only(&self) -> bool {
        self.remote.is_none()
    }

    fn remote(&self) -> Result<&SqlitePool, StoreError> {
        self.remote.as_ref().ok_or(StoreError::RemoteUnavailable)
    }

    pub async fn close(&self) {
        self.local.close().await;
        if let Some(remote) = &self.remote {
            remote.close().await;
        }
    }

    /// Stores the personal fields locally and the anonymized document
    /// remotely. A failed remote write keeps the local record.
    pub async fn add_patient(&self, patient: &NewPatient) -> Result<AddOutcome, StoreError> {
        patient.validate()?;

        let uuid = uuid::Uuid::new_v4().to_string();
        let now = Local::now().to_rfc3339();
        let document = serde_json::to_value(MedicalDocument::new(
            &uuid,
            parse_age(&patient.age),
            parse_height(&patient.height)?,
            &now,
        ))?;
        verify_no_personal_data(&document)?;
        log::info!("generated linking id {uuid}");

        queries::insert_patient(
            &self.local,
            &uuid,
            patient.full_name.trim(),
            patient.phone.trim(),
            patient.email.trim(),
        )
        .await?;
        log::info!("personal data stored locally for {uuid}");

        let medical_saved = match &self.remote {
            Some(remote) => match queries::put_document(remote, &uuid, &document).await {
                Ok(()) => {
                    log::info!("anonymized medical data stored for {uuid}");
                    true
                }
                Err(e) => {
                    log::error!("medical store write failed for {uuid}: {e}");
                    log::warn!("continuing with local storage only");
                    false
                }
            },
            None => {
                log::warn!("medical store not configured, medical data for {uuid} not saved");
                false
            }
        };

        Ok(AddOutcome {
            uuid,
            medical_saved,
        })
    }

    /// The anonymized document only. Personal fields never come back from
    /// here, but a document that carries them anyway is flagged.
    pub async fn patient_detail(&self, uuid: &str) -> Result<PatientDetail, StoreError> {
        let document = queries::get_document(self.remote()?, uuid)
            .await?
            .ok_or_else(|| StoreError::NotFound(uuid.to_string()))?;

        let found = personal_fields_in(&document);
        let security_warning = if found.is_empty() {
            None
        } else {
            log::error!("personal data {found:?} found in medical store for {uuid}");
            Some(SECURITY_WARNING.to_string())
        };

        Ok(PatientDetail {
            document,
            security_warning,
        })
    }

    /// Backend-only lookup of the personal half.
    pub async fn personal_record(&self, uuid: &str) -> Result<PatientRecord, StoreError> {
        queries::get_patient_by_uuid(&self.local, uuid)
            .await?
            .ok_or_else(|| StoreError::NotFound(uuid.to_string()))
    }

    /// Replaces age and height. Blank or non-digit ages clear the value.
    pub async fn update_medical(&self, uuid: &str, age: &str, height: &str) -> Result<(), StoreError> {
        let remote = self.remote()?;
        let mut document = queries::get_document(remote, uuid)
            .await?
            .ok_or_else(|| StoreError::NotFound(uuid.to_string()))?;

        let update = serde_json::json!({
            "age": parse_age(age),
            "height": parse_height(height)?,
            "last_updated": Local::now().to_rfc3339(),
        });
        verify_no_personal_data(&update)?;

        if let (Value::Object(target), Value::Object(changes)) = (&mut document, update) {
            target.extend(changes);
        }
        queries::put_document(remote, uuid, &document).await?;
        log::info!("updated anonymized medical data for {uuid}");

        Ok(())
    }

    /// Removes both halves. A failing medical store is logged and reported
    /// through the outcome rather than undoing the local delete.
    pub async fn delete_patient(&self, uuid: &str) -> Result<DeleteOutcome, StoreError> {
        let personal_removed = queries::delete_patient(&self.local, uuid).await?;
        log::info!("deleted personal data for {uuid}");

        let medical_removed = match &self.remote {
            Some(remote) => queries::delete_document(remote, uuid)
                .await
                .unwrap_or_else(|e| {
                    log::error!("medical store delete failed for {uuid}: {e}");
                    false
                }),
            None => false,
        };

        Ok(DeleteOutcome {
            personal_removed,
            medical_removed,
        })
    }

    pub async fn list_medical(&self) -> Result<Vec<DashboardRow>, StoreError> {
        let documents = queries::all_documents(self.remote()?).await?;
        log::info!("loaded {} anonymized medical records", documents.len());
        Ok(documents
            .iter()
            .map(|(_, document)| DashboardRow::from_document(document))
            .collect())
    }

    /// All anonymized documents with any top-level personal key stripped.
    pub async fn export_medical(&self) -> Result<MedicalExport, StoreError> {
        let data: Vec<Value> = queries::all_documents(self.remote()?)
            .await?
            .into_iter()
            .map(|(_, mut document)| {
                if let Value::Object(map) = &mut document {
                    for field in PERSONAL_FIELDS {
                        map.remove(field);
                    }
                }
                document
            })
            .collect();

        Ok(MedicalExport {
            count: data.len(),
            data,
            note: "Anonymous medical data only - no personal identifiers",
        })
    }

    /// Audits both stores for leaks across the split and for broken links.
    pub async fn verify_separation(&self) -> Result<SeparationReport, StoreError> {
        let local_uuids = queries::patient_uuids(&self.local).await?;
        let medical_columns_in_local = queries::patient_columns(&self.local)
            .await?
            .into_iter()
            .filter(|column| is_medical_column(column))
            .collect();

        let mut report = SeparationReport {
            local_patients: local_uuids.len(),
            medical_checked: self.remote.is_some(),
            medical_columns_in_local,
            ..SeparationReport::default()
        };

        let Some(remote) = &self.remote else {
            log::warn!("medical store not configured, skipping remote checks");
            return Ok(report);
        };

        let documents = queries::all_documents(remote).await?;
        report.medical_records = documents.len();

        let mut personal = BTreeSet::new();
        let mut remote_uuids = BTreeSet::new();
        for (doc_id, document) in &documents {
            personal.extend(personal_fields_in(document));

            match document.get("uuid").and_then(Value::as_str) {
                None => report.documents_missing_uuid.push(doc_id.clone()),
                Some(uuid) => {
                    if !is_well_formed_uuid(uuid) {
                        report.malformed_uuids.push(uuid.to_string());
                    }
                    remote_uuids.insert(uuid.to_string());
                }
            }

            if !has_medical_fields(document) {
                report.documents_without_medical_data.push(doc_id.clone());
            }
        }
        report.personal_fields_in_medical = personal.into_iter().collect();

        let local_uuids: BTreeSet<String> = local_uuids.into_iter().collect();
        report.local_only = local_uuids.difference(&remote_uuids).cloned().collect();
        report.medical_only = remote_uuids.difference(&local_uuids).cloned().collect();
        report.linked = local_uuids.intersection(&remote_uuids).count();

        if report.personal_in_medical() {
            log::error!(
                "personal fields found in medical store: {:?}",
                report.personal_fields_in_medical
            );
        }
        Ok(report)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MedicalExport {
    pub count: usize,
    pub data: Vec<Value>,
    pub note: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeparationReport {
    pub local_patients: usize,
    pub medical_records: usize,
    pub medical_checked: bool,
    pub medical_columns_in_local: Vec<String>,
    pub personal_fields_in_medical: Vec<String>,
    pub documents_missing_uuid: Vec<String>,
    pub malformed_uuids: Vec<String>,
    pub documents_without_medical_data: Vec<String>,
    pub local_only: Vec<String>,
    pub medical_only: Vec<String>,
    pub linked: usize,
}

impl SeparationReport {
    pub fn medical_in_local(&self) -> bool {
        !self.medical_columns_in_local.is_empty()
    }

    pub fn personal_in_medical(&self) -> bool {
        !self.personal_fields_in_medical.is_empty()
    }

    pub fn linkage_issues(&self) -> bool {
        !self.local_only.is_empty() || !self.medical_only.is_empty()
    }

    /// Leaks in either direction. Linkage problems are warnings only.
    pub fn is_separated(&self) -> bool {
        !self.medical_in_local() && !self.personal_in_medical()
    }
}
