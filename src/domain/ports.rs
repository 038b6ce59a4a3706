use crate::domain::model::Listing;
use crate::utils::error::Result;
use async_trait::async_trait;

/// One outbound search request. Stateless across invocations; the search
/// criteria are fixed at construction time.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Listing>>;
}

/// Durable read/write of the raw seen-id sequence for the single partition.
/// `read` distinguishes an absent record (`None`) from a present-but-empty
/// one; both are treated as an empty seen-set by the store above it.
#[async_trait]
pub trait SeenRepository: Send + Sync {
    async fn read(&self) -> Result<Option<Vec<String>>>;
    async fn write(&self, seen_ids: &[String]) -> Result<()>;
}

/// The seen-set with its in-memory working copy. Exactly one durable read
/// (first `load`) and one durable write (`flush`) per run.
///
/// `is_seen` and `mark_seen` before a successful `load` fail with
/// `StoreNotLoadedError`: a contract violation, not a runtime condition.
#[async_trait]
pub trait SeenStore: Send {
    /// Idempotent; only the first call hits durable storage.
    async fn load(&mut self) -> Result<()>;
    fn is_seen(&self, id: &str) -> Result<bool>;
    fn mark_seen(&mut self, id: &str) -> Result<()>;
    /// Overwrites the prior durable record, last-writer-wins.
    async fn flush(&mut self) -> Result<()>;
}

/// Fire-and-forget alert dispatch for one listing. No internal retry.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, listing: &Listing) -> Result<()>;
}
