//! # Content-Addressed Cache
//!
//! Deduplicates analyses by the SHA-256 of the submitted lyrics. The cache has
//! no storage of its own: it reads and writes the hash index of the shared
//! [`AnalysisStore`], and it serializes concurrent first-time submissions of
//! the same lyrics so the provider is called once per unique payload.

use crate::{hashing::content_hash, providers::db::AnalysisStore, types::LyricsAnalysis};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type InFlight = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

#[derive(Clone)]
pub struct ContentCache {
    store: Arc<dyn AnalysisStore>,
    in_flight: InFlight,
}

impl fmt::Debug for ContentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentCache")
            .field("store", &self.store.name())
            .finish_non_exhaustive()
    }
}

impl ContentCache {
    pub fn new(store: Arc<dyn AnalysisStore>) -> Self {
        Self {
            store,
            in_flight: Arc::default(),
        }
    }

    /// Returns the analysis previously computed for exactly these lyrics.
    pub async fn lookup(&self, lyrics: &str) -> Option<LyricsAnalysis> {
        self.lookup_hash(&content_hash(lyrics)).await
    }

    pub async fn lookup_hash(&self, hash: &str) -> Option<LyricsAnalysis> {
        self.store.get_by_hash(hash).await
    }

    /// Associates `hash` with a freshly stored analysis. The first record wins.
    pub async fn record(&self, hash: &str, id: i64) -> bool {
        self.store.record_hash(hash, id).await
    }

    /// Waits until no other request is computing an analysis for `hash`.
    ///
    /// The returned guard must be held across the provider call and the store
    /// insert. Slots nobody holds or waits on are pruned on every call.
    pub async fn lock(&self, hash: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            in_flight.retain(|_, slot| Arc::strong_count(slot) > 1);
            in_flight.entry(hash.to_string()).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// The number of hashes currently being computed or waited on.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| Arc::strong_count(slot) > 1)
            .count()
    }
}
