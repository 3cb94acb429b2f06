use color_eyre::eyre::eyre;
use dotenv::dotenv;
use std::env;
use std::path::{Path, PathBuf};

pub const PII_DATABASE_VAR: &str = "PII_DATABASE_NAME";
pub const MEDICAL_DATABASE_VAR: &str = "MEDICAL_DATABASE_NAME";
const DEFAULT_PII_DATABASE: &str = "db_local.sqlite";
const DEFAULT_MEDICAL_DATABASE: &str = "db_medical.sqlite";

/// Where the two halves of a patient record live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub pii_url: String,
    /// `None` means local-only mode.
    pub medical_url: Option<String>,
}

/// Loads `.env` and resolves both database locations relative to the
/// current directory.
pub fn init_app_config() -> color_eyre::eyre::Result<StoreConfig> {
    dotenv().ok();

    let base_dir = env::current_dir()?;
    let pii_name =
        env::var(PII_DATABASE_VAR).unwrap_or_else(|_| DEFAULT_PII_DATABASE.to_string());
    let medical_name =
        env::var(MEDICAL_DATABASE_VAR).unwrap_or_else(|_| DEFAULT_MEDICAL_DATABASE.to_string());

    let pii_url = sqlite_url(&base_dir.join(pii_name))?;
    let medical_url = if medical_name.trim().is_empty() {
        log::warn!("{MEDICAL_DATABASE_VAR} is empty, medical data will not be stored");
        None
    } else {
        Some(sqlite_url(&base_dir.join(medical_name))?)
    };

    Ok(StoreConfig {
        pii_url,
        medical_url,
    })
}

/// SQLx wants `sqlite:///abs/path` for absolute paths and `sqlite://rel/path`
/// otherwise.
pub fn sqlite_url(database_path: &Path) -> color_eyre::eyre::Result<String> {
    if let Some(parent) = database_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let path_str = database_path
        .to_str()
        .ok_or_else(|| eyre!("Invalid database path"))?;
    let clean_path = path_str.trim_start_matches('/');

    let url = if database_path.is_absolute() {
        format!("sqlite:///{clean_path}")
    } else {
        format!("sqlite://{clean_path}")
    };
    log::debug!("database {path_str} -> {url}");
    Ok(url)
}

/// Inverse of [`sqlite_url`].
pub fn path_from_url(url: &str) -> color_eyre::eyre::Result<PathBuf> {
    let path_part = url
        .strip_prefix("sqlite://")
        .ok_or_else(|| eyre!("Not a valid SQLite URL: {url}"))?;

    if cfg!(windows) {
        if let Some(drive_idx) = path_part.find(':') {
            if drive_idx > 0 {
                return Ok(PathBuf::from(
                    path_part.strip_prefix('/').unwrap_or(path_part),
                ));
            }
        }
    }

    if path_part.starts_with('/') {
        return Ok(PathBuf::from(format!(
            "/{}",
            path_part.trim_start_matches('/')
        )));
    }

    Ok(PathBuf::from(path_part))
}
