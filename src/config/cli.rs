use crate::core::store::PARTITION_KEY;
use crate::core::{Alert, Listing, Notifier, SeenRecord, SeenRepository};
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Seen repository backed by a local JSON file, for running the watch
/// without AWS. The file holds one `SeenRecord`; a missing file is the
/// absent-record case.
#[derive(Debug, Clone)]
pub struct FileSeenRepository {
    path: PathBuf,
}

impl FileSeenRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeenRepository for FileSeenRepository {
    async fn read(&self) -> Result<Option<Vec<String>>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(WatchError::StoreError {
                    message: format!("Failed to read seen file {}: {}", self.path.display(), e),
                })
            }
        };

        let record: SeenRecord =
            serde_json::from_slice(&data).map_err(|e| WatchError::StoreError {
                message: format!("Malformed seen file {}: {}", self.path.display(), e),
            })?;
        Ok(Some(record.seen_ids))
    }

    async fn write(&self, seen_ids: &[String]) -> Result<()> {
        let record = SeenRecord {
            partition_key: PARTITION_KEY.to_string(),
            seen_ids: seen_ids.to_vec(),
        };
        let data = serde_json::to_vec_pretty(&record).map_err(|e| WatchError::StoreError {
            message: format!("Failed to encode seen record: {}", e),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| *p != Path::new("")) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WatchError::StoreError {
                    message: format!("Failed to create {}: {}", parent.display(), e),
                })?;
        }

        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| WatchError::StoreError {
                message: format!("Failed to write seen file {}: {}", self.path.display(), e),
            })
    }
}

/// Notifier that only logs the alert. Stands in for the broadcast
/// transport in local runs.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    base_url: String,
}

impl LogNotifier {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, listing: &Listing) -> Result<()> {
        let alert = Alert::for_listing(listing, &self.base_url);
        tracing::info!("{}: {}", alert.subject, alert.message);
        Ok(())
    }
}
