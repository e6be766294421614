use crate::types::{LyricsAnalysis, NewAnalysis};
use async_trait::async_trait;
use std::fmt::Debug;

/// The number of records returned by `get_recent` when the caller gives no limit.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// A trait for interacting with the analysis storage backend.
///
/// Records are created once and never updated. The hash index maps the content
/// hash of a lyrics payload to the id of the analysis computed for it.
#[async_trait]
pub trait AnalysisStore: Send + Sync + Debug {
    /// Returns the name of the storage backend.
    fn name(&self) -> &str;

    /// Assigns the next id and the current timestamp, inserts the record and returns it.
    async fn create_analysis(&self, analysis: NewAnalysis) -> LyricsAnalysis;

    /// Looks up a record by its id.
    async fn get_by_id(&self, id: i64) -> Option<LyricsAnalysis>;

    /// Looks up a record through the hash index.
    async fn get_by_hash(&self, hash: &str) -> Option<LyricsAnalysis>;

    /// Associates a content hash with an analysis id.
    ///
    /// The first association for a hash wins. Returns `false` when the hash was
    /// already recorded or the id is unknown.
    async fn record_hash(&self, hash: &str, id: i64) -> bool;

    /// Returns up to `limit` records, newest first. Ties on `created_at` are
    /// broken by descending id.
    async fn get_recent(&self, limit: usize) -> Vec<LyricsAnalysis>;

    /// The number of records currently held.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
