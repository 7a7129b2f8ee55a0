use std::path::{Path, PathBuf};

use async_trait::async_trait;
use intake_spec::{FlatRecord, GatewayError, PersistenceGateway};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

/// Appends each record as one JSON object per line.
#[derive(Debug)]
pub struct FileGateway {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every stored record. A missing file holds no records.
    pub async fn read_records(&self) -> Result<Vec<FlatRecord>, GatewayError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(unavailable(&self.path, err)),
        };
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(idx, line)| {
                serde_json::from_str(line).map_err(|err| {
                    GatewayError::Rejected(format!(
                        "{} line {}: {err}",
                        self.path.display(),
                        idx + 1
                    ))
                })
            })
            .collect()
    }
}

fn unavailable(path: &Path, err: std::io::Error) -> GatewayError {
    GatewayError::Unavailable(format!("{}: {err}", path.display()))
}

#[async_trait]
impl PersistenceGateway for FileGateway {
    async fn insert(&self, record: &FlatRecord) -> Result<(), GatewayError> {
        let mut line = serde_json::to_string(record)
            .map_err(|err| GatewayError::Rejected(err.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| unavailable(parent, err))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|err| unavailable(&self.path, err))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|err| unavailable(&self.path, err))?;
        file.flush()
            .await
            .map_err(|err| unavailable(&self.path, err))?;
        debug!(path = %self.path.display(), "questionnaire response appended");
        Ok(())
    }
}
