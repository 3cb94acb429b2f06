use serde_json::Value;
use sqlx::{query, query_as, query_scalar, SqlitePool};

use crate::db::models::PatientRecord;
use crate::error::StoreError;

// Personal store

pub async fn insert_patient(
    pool: &SqlitePool,
    uuid: &str,
    full_name: &str,
    phone: &str,
    email: &str,
) -> Result<(), sqlx::Error> {
    query("INSERT INTO patients (uuid, full_name, phone, email) VALUES (?, ?, ?, ?)")
        .bind(uuid)
        .bind(full_name)
        .bind(phone)
        .bind(email)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_patient_by_uuid(
    pool: &SqlitePool,
    uuid: &str,
) -> Result<Option<PatientRecord>, sqlx::Error> {
    query_as::<_, PatientRecord>(
        "SELECT id, uuid, full_name, phone, email, \
         COALESCE(CAST(created_at AS TEXT), '') AS created_at \
         FROM patients WHERE uuid = ?",
    )
    .bind(uuid)
    .fetch_optional(pool)
    .await
}

pub async fn patient_uuids(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    query_scalar("SELECT uuid FROM patients ORDER BY id")
        .fetch_all(pool)
        .await
}

/// Returns whether a row was removed.
pub async fn delete_patient(pool: &SqlitePool, uuid: &str) -> Result<bool, sqlx::Error> {
    let result = query("DELETE FROM patients WHERE uuid = ?")
        .bind(uuid)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn patient_columns(pool: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    query_scalar("SELECT name FROM pragma_table_info('patients') ORDER BY cid")
        .fetch_all(pool)
        .await
}

// Medical store

pub async fn put_document(
    pool: &SqlitePool,
    doc_id: &str,
    document: &Value,
) -> Result<(), StoreError> {
    let body = serde_json::to_string(document)?;
    query(
        "INSERT INTO patients_medical (doc_id, document) VALUES (?, ?) \
         ON CONFLICT(doc_id) DO UPDATE SET document = excluded.document",
    )
    .bind(doc_id)
    .bind(body)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_document(pool: &SqlitePool, doc_id: &str) -> Result<Option<Value>, StoreError> {
    let body: Option<String> =
        query_scalar("SELECT document FROM patients_medical WHERE doc_id = ?")
            .bind(doc_id)
            .fetch_optional(pool)
            .await?;

    Ok(body.map(|body| serde_json::from_str(&body)).transpose()?)
}

/// Every document with its id, in insertion order.
pub async fn all_documents(pool: &SqlitePool) -> Result<Vec<(String, Value)>, StoreError> {
    let rows = query_as::<_, (String, String)>(
        "SELECT doc_id, document FROM patients_medical ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(doc_id, body)| Ok((doc_id, serde_json::from_str(&body)?)))
        .collect()
}

pub async fn delete_document(pool: &SqlitePool, doc_id: &str) -> Result<bool, sqlx::Error> {
    let result = query("DELETE FROM patients_medical WHERE doc_id = ?")
        .bind(doc_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::{memory_pool, setup_local_schema, setup_medical_schema};
    use serde_json::json;

    async fn setup_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = memory_pool().await?;
        setup_local_schema(&pool).await?;
        setup_medical_schema(&pool).await?;

        query(
            "INSERT INTO patients (uuid, full_name, phone, email, created_at)
             VALUES ('u-1', 'Test Patient', '555-0100', 'test@example.org', '2025-04-21 10:00:00')",
        )
        .execute(&pool)
        .await?;

        Ok(pool)
    }

    #[tokio::test]
    async fn test_get_patient_by_uuid() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let patient = get_patient_by_uuid(&pool, "u-1").await?.ok_or("missing")?;
        assert_eq!(patient.full_name, "Test Patient");
        assert_eq!(patient.created_at, "2025-04-21 10:00:00");
        assert!(get_patient_by_uuid(&pool, "u-2").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_uuid_is_unique() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let duplicate = insert_patient(&pool, "u-1", "Other", "1", "o@example.org").await;
        assert!(duplicate.is_err());
        assert_eq!(patient_uuids(&pool).await?, vec!["u-1"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_patient_columns() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let columns = patient_columns(&pool).await?;
        assert_eq!(
            columns,
            vec!["id", "uuid", "full_name", "phone", "email", "created_at"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_document_upsert_and_delete() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        put_document(&pool, "u-1", &json!({ "uuid": "u-1", "age": 30 })).await?;
        put_document(&pool, "u-1", &json!({ "uuid": "u-1", "age": 31 })).await?;

        let document = get_document(&pool, "u-1").await?.ok_or("missing")?;
        assert_eq!(document["age"], 31);
        assert_eq!(all_documents(&pool).await?.len(), 1);

        assert!(delete_document(&pool, "u-1").await?);
        assert!(!delete_document(&pool, "u-1").await?);
        assert!(get_document(&pool, "u-1").await?.is_none());

        Ok(())
    }
}
