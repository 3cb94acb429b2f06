use crate::config::{path_from_url, StoreConfig};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

/// Personal data only: name and contact details keyed by the linking uuid.
pub async fn setup_local_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT UNIQUE NOT NULL,
            full_name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// The anonymized collection: one JSON document per patient.
pub async fn setup_medical_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(
        "CREATE TABLE IF NOT EXISTS patients_medical (
            doc_id TEXT PRIMARY KEY,
            document TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Opens (creating if needed) a SQLite database and returns a pool.
pub async fn create_database_pool(database_url: &str) -> Result<SqlitePool> {
    let db_path = path_from_url(database_url)?;
    log::debug!("opening SQLite database at {}", db_path.display());

    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| eyre!("Failed to create database directory: {e}"))?;
        }

        let metadata = parent
            .metadata()
            .map_err(|e| eyre!("Failed to access directory metadata: {e}"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o200 == 0 {
                return Err(eyre!(
                    "Database directory {} is not writable",
                    parent.display()
                ));
            }
        }
        #[cfg(not(unix))]
        let _ = metadata;
    }

    if db_path.exists() {
        std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&db_path)
            .map_err(|e| eyre!("Database file permission error: {e}"))?;
    }

    let exists = Sqlite::database_exists(database_url)
        .await
        .map_err(|e| eyre!("Error checking database: {e}"))?;
    if !exists {
        log::info!("creating database {}", db_path.display());
        Sqlite::create_database(database_url)
            .await
            .map_err(|e| eyre!("Failed to create SQLite database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .after_connect(|conn, _| {
            Box::pin(async move {
                use sqlx::Executor as _;
                conn.execute("PRAGMA foreign_keys = ON;").await?;
                conn.execute("PRAGMA journal_mode = WAL;").await?;
                conn.execute("PRAGMA synchronous = NORMAL;").await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
        .map_err(|e| eyre!("Failed to connect to SQLite database: {e}"))?;

    Ok(pool)
}

/// Both stores, schemas applied. The medical store is optional: if it is not
/// configured or cannot be opened the tool keeps working on personal data.
pub async fn open_stores(config: &StoreConfig) -> Result<(SqlitePool, Option<SqlitePool>)> {
    let local = create_database_pool(&config.pii_url).await?;
    setup_local_schema(&local)
        .await
        .map_err(|e| eyre!("Failed to set up personal data schema: {e}"))?;
    log::info!("personal data store ready");

    let Some(medical_url) = &config.medical_url else {
        log::warn!("medical store not configured, running in local-only mode");
        return Ok((local, None));
    };

    let remote = match create_database_pool(medical_url).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("medical store unavailable: {e}");
            log::warn!("running in local-only mode");
            return Ok((local, None));
        }
    };
    if let Err(e) = setup_medical_schema(&remote).await {
        log::error!("failed to set up medical schema: {e}");
        return Ok((local, None));
    }
    log::info!("anonymized medical store ready");

    Ok((local, Some(remote)))
}

/// Single-connection in-memory pool; every connection of a `:memory:` URL
/// would otherwise see its own empty database.
#[cfg(test)]
pub async fn memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
}
