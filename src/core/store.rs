use crate::core::{SeenRepository, SeenStore};
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use std::collections::HashSet;

/// Fixed partition key addressing the single seen-set record.
pub const PARTITION_KEY: &str = "seen-listings";

/// Seen-set store over any durable repository. Holds the working copy for
/// one run: `load` pulls the prior record once, `mark_seen` mutates only
/// memory, `flush` writes the whole set back in a single overwrite.
pub struct SeenSetStore<R: SeenRepository> {
    repository: R,
    working_set: Option<HashSet<String>>,
}

impl<R: SeenRepository> SeenSetStore<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            working_set: None,
        }
    }
}

#[async_trait]
impl<R: SeenRepository> SeenStore for SeenSetStore<R> {
    async fn load(&mut self) -> Result<()> {
        if self.working_set.is_some() {
            return Ok(());
        }

        // Absent record == first-ever run, not an error.
        let seen_ids = self.repository.read().await?.unwrap_or_default();
        tracing::debug!("Loaded seen-set with {} ids", seen_ids.len());

        self.working_set = Some(seen_ids.into_iter().collect());
        Ok(())
    }

    fn is_seen(&self, id: &str) -> Result<bool> {
        let working_set = self
            .working_set
            .as_ref()
            .ok_or(WatchError::StoreNotLoadedError)?;
        Ok(working_set.contains(id))
    }

    fn mark_seen(&mut self, id: &str) -> Result<()> {
        let working_set = self
            .working_set
            .as_mut()
            .ok_or(WatchError::StoreNotLoadedError)?;
        // Duplicate adds are harmless no-ops.
        working_set.insert(id.to_string());
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        let working_set = self
            .working_set
            .as_ref()
            .ok_or(WatchError::StoreNotLoadedError)?;

        let mut seen_ids: Vec<String> = working_set.iter().cloned().collect();
        // Stable order keeps the durable record diffable across runs.
        seen_ids.sort();

        tracing::debug!("Flushing seen-set with {} ids", seen_ids.len());
        self.repository.write(&seen_ids).await
    }
}
