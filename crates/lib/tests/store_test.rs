//! # In-Memory Store Tests

use lyricsense::hashing::content_hash;
use lyricsense::providers::db::{AnalysisStore, MemoryStore};
use lyricsense::{Insight, NewAnalysis};

fn new_analysis(lyrics: &str) -> NewAnalysis {
    NewAnalysis {
        lyrics: lyrics.to_string(),
        song_title: Some("A Song".to_string()),
        artist: None,
        references: vec![Insight {
            title: "References".to_string(),
            description: "Something".to_string(),
            icon: "🔗".to_string(),
        }],
        curiosities: vec![],
        author_intention: "📝 Something else".to_string(),
    }
}

#[tokio::test]
async fn test_create_then_get_by_id_round_trips() {
    let store = MemoryStore::new();
    let created = store.create_analysis(new_analysis("first")).await;
    let fetched = store.get_by_id(created.id).await.expect("record should exist");
    assert_eq!(created, fetched);
}

#[tokio::test]
async fn test_ids_start_at_one_and_increase() {
    let store = MemoryStore::new();
    let a = store.create_analysis(new_analysis("a")).await;
    let b = store.create_analysis(new_analysis("b")).await;
    let c = store.create_analysis(new_analysis("c")).await;
    assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    assert!(a.created_at <= b.created_at && b.created_at <= c.created_at);
}

#[tokio::test]
async fn test_unknown_id_is_none() {
    let store = MemoryStore::new();
    assert!(store.get_by_id(42).await.is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_get_recent_orders_newest_first() {
    let store = MemoryStore::new();
    for lyrics in ["one", "two", "three", "four"] {
        store.create_analysis(new_analysis(lyrics)).await;
    }

    let recent = store.get_recent(3).await;
    let ids: Vec<i64> = recent.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![4, 3, 2]);

    for pair in recent.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn test_get_recent_limits() {
    let store = MemoryStore::new();
    store.create_analysis(new_analysis("one")).await;
    store.create_analysis(new_analysis("two")).await;

    assert!(store.get_recent(0).await.is_empty());
    assert_eq!(store.get_recent(100).await.len(), 2);
}

#[tokio::test]
async fn test_record_hash_first_wins() {
    let store = MemoryStore::new();
    let first = store.create_analysis(new_analysis("same")).await;
    let second = store.create_analysis(new_analysis("same")).await;
    let hash = content_hash("same");

    assert!(store.record_hash(&hash, first.id).await);
    assert!(!store.record_hash(&hash, second.id).await);
    assert_eq!(store.get_by_hash(&hash).await.map(|a| a.id), Some(first.id));
}

#[tokio::test]
async fn test_record_hash_rejects_unknown_id() {
    let store = MemoryStore::new();
    assert!(!store.record_hash(&content_hash("x"), 7).await);
    assert!(store.get_by_hash(&content_hash("x")).await.is_none());
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = MemoryStore::new();
    let clone = store.clone();
    let created = store.create_analysis(new_analysis("shared")).await;
    assert_eq!(clone.get_by_id(created.id).await, Some(created));
}

#[tokio::test]
async fn test_capacity_evicts_oldest_and_its_hash() {
    let store = MemoryStore::with_capacity(2);
    let mut ids = Vec::new();
    for lyrics in ["one", "two", "three"] {
        let created = store.create_analysis(new_analysis(lyrics)).await;
        store.record_hash(&content_hash(lyrics), created.id).await;
        ids.push(created.id);
    }

    assert_eq!(store.len().await, 2);
    assert!(store.get_by_id(ids[0]).await.is_none());
    assert!(store.get_by_hash(&content_hash("one")).await.is_none());
    assert_eq!(
        store.get_by_hash(&content_hash("three")).await.map(|a| a.id),
        Some(ids[2])
    );
}
