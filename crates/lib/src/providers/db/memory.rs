//! # In-Memory Analysis Store
//!
//! A process-lifetime store for computed analyses. Cloning a `MemoryStore`
//! shares the same underlying maps, so one instance is built at startup and
//! handed to every component that needs it.

use super::storage::AnalysisStore;
use crate::types::{LyricsAnalysis, NewAnalysis};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct StoreInner {
    analyses: BTreeMap<i64, LyricsAnalysis>,
    hash_to_id: HashMap<String, i64>,
    next_id: i64,
    last_created_at: Option<DateTime<Utc>>,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            analyses: BTreeMap::new(),
            hash_to_id: HashMap::new(),
            next_id: 1,
            last_created_at: None,
        }
    }
}

/// An in-memory implementation of [`AnalysisStore`].
///
/// Unbounded unless built with [`MemoryStore::with_capacity`], in which case
/// the oldest record is evicted once the capacity is exceeded.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
    max_entries: Option<usize>,
}

impl MemoryStore {
    /// Creates a new, empty, unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding at most `max_entries` records (minimum 1).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            inner: Arc::default(),
            max_entries: Some(max_entries.max(1)),
        }
    }

    /// Creates a store from an optional capacity, as read from configuration.
    pub fn from_max_entries(max_entries: Option<usize>) -> Self {
        match max_entries {
            Some(max) => Self::with_capacity(max),
            None => Self::new(),
        }
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_analysis(&self, analysis: NewAnalysis) -> LyricsAnalysis {
        let mut inner = self.inner.write().await;

        let id = inner.next_id;
        inner.next_id += 1;

        // Timestamps never go backwards, so creation order and id order agree.
        let now = Utc::now();
        let created_at = match inner.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        inner.last_created_at = Some(created_at);

        let record = LyricsAnalysis::from_new(id, created_at, analysis);
        inner.analyses.insert(id, record.clone());

        if let Some(max) = self.max_entries {
            while inner.analyses.len() > max {
                let Some((evicted, _)) = inner.analyses.pop_first() else {
                    break;
                };
                inner.hash_to_id.retain(|_, v| *v != evicted);
                debug!(evicted_id = evicted, "Evicted oldest analysis from store.");
            }
        }

        record
    }

    async fn get_by_id(&self, id: i64) -> Option<LyricsAnalysis> {
        self.inner.read().await.analyses.get(&id).cloned()
    }

    async fn get_by_hash(&self, hash: &str) -> Option<LyricsAnalysis> {
        let inner = self.inner.read().await;
        let id = inner.hash_to_id.get(hash)?;
        inner.analyses.get(id).cloned()
    }

    async fn record_hash(&self, hash: &str, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        if !inner.analyses.contains_key(&id) || inner.hash_to_id.contains_key(hash) {
            return false;
        }
        inner.hash_to_id.insert(hash.to_string(), id);
        true
    }

    async fn get_recent(&self, limit: usize) -> Vec<LyricsAnalysis> {
        let inner = self.inner.read().await;
        let mut records: Vec<LyricsAnalysis> = inner.analyses.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        records.truncate(limit);
        records
    }

    async fn len(&self) -> usize {
        self.inner.read().await.analyses.len()
    }
}
