use crate::core::{ListingSource, Notifier, SeenStore};
use crate::utils::error::Result;

/// What to do with a listing whose alert failed to send.
///
/// The default reproduces the deployed behavior: the listing is marked seen
/// anyway, so a transient notify failure becomes a silently lost
/// notification rather than a retried one. Operators accepting that trade
/// keep `AlwaysMark`; `MarkOnSuccess` leaves the listing unseen so the next
/// run retries it, at the cost of a possible duplicate alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkPolicy {
    #[default]
    AlwaysMark,
    MarkOnSuccess,
}

/// Outcome of one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub listings_fetched: usize,
    pub alerts_sent: usize,
}

/// One fetch → diff → notify → flush cycle.
pub struct WatchEngine<S: ListingSource, D: SeenStore, N: Notifier> {
    source: S,
    store: D,
    notifier: N,
    mark_policy: MarkPolicy,
}

impl<S: ListingSource, D: SeenStore, N: Notifier> WatchEngine<S, D, N> {
    pub fn new(source: S, store: D, notifier: N) -> Self {
        Self {
            source,
            store,
            notifier,
            mark_policy: MarkPolicy::default(),
        }
    }

    pub fn with_mark_policy(mut self, mark_policy: MarkPolicy) -> Self {
        self.mark_policy = mark_policy;
        self
    }

    /// Runs one cycle. Failure semantics:
    /// - fetch failure: nothing was mutated, no flush;
    /// - load failure: aborts before any notification, no flush, durable
    ///   state untouched;
    /// - notify failure: stops the loop but the accumulated working set is
    ///   still flushed, then the notify error is reported;
    /// - flush failure: terminal error even when processing succeeded.
    pub async fn run(&mut self) -> Result<RunReport> {
        let listings = self.source.fetch().await?;
        tracing::info!("Fetched {} listings", listings.len());

        // Load up front so an unreadable seen-set aborts before any alert
        // goes out against unknown state.
        self.store.load().await?;

        let mut alerts_sent = 0;
        let mut notify_failure = None;

        for listing in &listings {
            if self.store.is_seen(&listing.id)? {
                tracing::debug!(id = %listing.id, "Listing already seen, skipping");
                continue;
            }

            tracing::info!(id = %listing.id, "New listing, sending alert");
            match self.notifier.send(listing).await {
                Ok(()) => {
                    alerts_sent += 1;
                    self.store.mark_seen(&listing.id)?;
                }
                Err(e) => {
                    tracing::error!(id = %listing.id, "Failed to send alert: {}", e);
                    if self.mark_policy == MarkPolicy::AlwaysMark {
                        self.store.mark_seen(&listing.id)?;
                    }
                    notify_failure = Some(e);
                    break;
                }
            }
        }

        // Flush even after a notify failure: alerts already sent must stay
        // recorded or the next run would duplicate them.
        self.store.flush().await?;

        match notify_failure {
            Some(e) => Err(e),
            None => Ok(RunReport {
                listings_fetched: listings.len(),
                alerts_sent,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Listing;
    use crate::utils::error::WatchError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct StubSource {
        listings: Vec<Listing>,
        fail: bool,
    }

    #[async_trait]
    impl ListingSource for StubSource {
        async fn fetch(&self) -> Result<Vec<Listing>> {
            if self.fail {
                return Err(WatchError::FetchStatusError { status: 500 });
            }
            Ok(self.listings.clone())
        }
    }

    #[derive(Default)]
    struct FakeStore {
        loaded: bool,
        fail_load: bool,
        seen: Vec<String>,
        loads: usize,
        flushes: usize,
    }

    #[async_trait]
    impl SeenStore for FakeStore {
        async fn load(&mut self) -> Result<()> {
            self.loads += 1;
            if self.fail_load {
                return Err(WatchError::StoreError {
                    message: "simulated load failure".to_string(),
                });
            }
            self.loaded = true;
            Ok(())
        }

        fn is_seen(&self, id: &str) -> Result<bool> {
            if !self.loaded {
                return Err(WatchError::StoreNotLoadedError);
            }
            Ok(self.seen.iter().any(|s| s == id))
        }

        fn mark_seen(&mut self, id: &str) -> Result<()> {
            if !self.loaded {
                return Err(WatchError::StoreNotLoadedError);
            }
            if !self.seen.iter().any(|s| s == id) {
                self.seen.push(id.to_string());
            }
            Ok(())
        }

        async fn flush(&mut self) -> Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail_on: Option<String>,
        attempts: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, listing: &Listing) -> Result<()> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.as_deref() == Some(listing.id.as_str()) {
                return Err(WatchError::NotifyError {
                    message: "simulated transport rejection".to_string(),
                });
            }
            self.sent.lock().unwrap().push(listing.id.clone());
            Ok(())
        }
    }

    fn listing(id: &str) -> Listing {
        Listing {
            id: id.to_string(),
            relative_details_url: format!("/real-estate/{}/x", id),
        }
    }

    #[tokio::test]
    async fn test_notifies_unseen_listings_in_fetch_order() {
        let source = StubSource {
            listings: vec![listing("A"), listing("B"), listing("C")],
            fail: false,
        };
        let store = FakeStore {
            seen: vec!["A".to_string()],
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let sent = notifier.sent.clone();

        let mut engine = WatchEngine::new(source, store, notifier);
        let report = engine.run().await.unwrap();

        assert_eq!(report.listings_fetched, 3);
        assert_eq!(report.alerts_sent, 2);
        assert_eq!(*sent.lock().unwrap(), vec!["B", "C"]);
        assert_eq!(engine.store.seen, vec!["A", "B", "C"]);
        assert_eq!(engine.store.flushes, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_load_and_flush() {
        let source = StubSource {
            listings: vec![],
            fail: true,
        };
        let notifier = RecordingNotifier::default();
        let attempts = notifier.attempts.clone();

        let mut engine = WatchEngine::new(source, FakeStore::default(), notifier);
        let result = engine.run().await;

        assert!(matches!(result, Err(WatchError::FetchStatusError { .. })));
        assert_eq!(engine.store.loads, 0);
        assert_eq!(engine.store.flushes, 0);
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_failure_aborts_before_any_notification() {
        let source = StubSource {
            listings: vec![listing("A")],
            fail: false,
        };
        let store = FakeStore {
            fail_load: true,
            ..Default::default()
        };
        let notifier = RecordingNotifier::default();
        let attempts = notifier.attempts.clone();

        let mut engine = WatchEngine::new(source, store, notifier);
        let result = engine.run().await;

        assert!(matches!(result, Err(WatchError::StoreError { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
        assert_eq!(engine.store.flushes, 0);
    }

    #[tokio::test]
    async fn test_notify_failure_marks_seen_and_still_flushes() {
        let source = StubSource {
            listings: vec![listing("1"), listing("2"), listing("3")],
            fail: false,
        };
        let notifier = RecordingNotifier {
            fail_on: Some("2".to_string()),
            ..Default::default()
        };
        let sent = notifier.sent.clone();

        let mut engine = WatchEngine::new(source, FakeStore::default(), notifier);
        let result = engine.run().await;

        assert!(matches!(result, Err(WatchError::NotifyError { .. })));
        // 1st sent, 2nd attempted and marked anyway, 3rd never reached.
        assert_eq!(*sent.lock().unwrap(), vec!["1"]);
        assert_eq!(engine.store.seen, vec!["1", "2"]);
        assert_eq!(engine.store.flushes, 1);
    }

    #[tokio::test]
    async fn test_notify_failure_with_mark_on_success_leaves_listing_unseen() {
        let source = StubSource {
            listings: vec![listing("1"), listing("2"), listing("3")],
            fail: false,
        };
        let notifier = RecordingNotifier {
            fail_on: Some("2".to_string()),
            ..Default::default()
        };

        let mut engine = WatchEngine::new(source, FakeStore::default(), notifier)
            .with_mark_policy(MarkPolicy::MarkOnSuccess);
        let result = engine.run().await;

        assert!(matches!(result, Err(WatchError::NotifyError { .. })));
        // The failed listing stays unseen so the next run retries it.
        assert_eq!(engine.store.seen, vec!["1"]);
        assert_eq!(engine.store.flushes, 1);
    }

    #[tokio::test]
    async fn test_duplicate_id_within_one_fetch_notifies_once() {
        let source = StubSource {
            listings: vec![listing("X"), listing("X")],
            fail: false,
        };
        let notifier = RecordingNotifier::default();
        let sent = notifier.sent.clone();

        let mut engine = WatchEngine::new(source, FakeStore::default(), notifier);
        let report = engine.run().await.unwrap();

        assert_eq!(report.alerts_sent, 1);
        assert_eq!(*sent.lock().unwrap(), vec!["X"]);
    }

    #[tokio::test]
    async fn test_empty_fetch_completes_with_flush() {
        let source = StubSource {
            listings: vec![],
            fail: false,
        };
        let mut engine =
            WatchEngine::new(source, FakeStore::default(), RecordingNotifier::default());
        let report = engine.run().await.unwrap();

        assert_eq!(report.listings_fetched, 0);
        assert_eq!(report.alerts_sent, 0);
        assert_eq!(engine.store.flushes, 1);
    }
}
