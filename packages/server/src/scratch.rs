use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

const ENTRIES_FILE: &str = "entries.json";
const REPORTS_DIR: &str = "reports";
const MAX_NAME_LEN: usize = 128;

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("Scratch file not found: {0}")]
    NotFound(String),
    #[error("Invalid report name: {0}")]
    InvalidName(String),
    #[error("Scratch I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scratch file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One appended record in `entries.json`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, utoipa::ToSchema)]
pub struct ScratchEntry {
    pub entry: Value,
    pub user_id: i32,
    pub recorded_at: DateTime<Utc>,
}

/// Local JSON files kept next to the server.
///
/// Layout: `{dir}/entries.json` (a JSON array) and `{dir}/reports/{name}.json`.
/// Every write goes through a temp file in `{dir}/.tmp` and is renamed into
/// place, and a single mutex serializes writers within the process.
pub struct ScratchStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl ScratchStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self, ScratchError> {
        let dir = dir.into();
        fs::create_dir_all(dir.join(REPORTS_DIR)).await?;
        fs::create_dir_all(dir.join(".tmp")).await?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn temp_path(&self) -> PathBuf {
        self.dir.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }

    fn report_path(&self, name: &str) -> Result<PathBuf, ScratchError> {
        let valid = !name.is_empty()
            && name.len() <= MAX_NAME_LEN
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(ScratchError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(REPORTS_DIR).join(format!("{name}.json")))
    }

    async fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<(), ScratchError> {
        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, target).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        Ok(())
    }

    /// All entries recorded so far (empty when the file does not exist yet).
    pub async fn entries(&self) -> Result<Vec<ScratchEntry>, ScratchError> {
        match fs::read(self.dir.join(ENTRIES_FILE)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Append one entry and return the new total.
    pub async fn append_entry(&self, entry: ScratchEntry) -> Result<usize, ScratchError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries().await?;
        entries.push(entry);
        let data = serde_json::to_vec_pretty(&entries)?;
        self.write_atomic(&self.dir.join(ENTRIES_FILE), &data).await?;
        Ok(entries.len())
    }

    pub async fn read_report(&self, name: &str) -> Result<Value, ScratchError> {
        let path = self.report_path(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ScratchError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn write_report(&self, name: &str, report: &Value) -> Result<(), ScratchError> {
        let path = self.report_path(name)?;
        let data = serde_json::to_vec_pretty(report)?;
        let _guard = self.write_lock.lock().await;
        self.write_atomic(&path, &data).await
    }
}
