//! # Lookup Endpoint Tests
//!
//! Tests for `GET /api/analysis/{id}`, `GET /api/recent` and the liveness
//! endpoints.

mod common;

use anyhow::Result;
use common::TestApp;
use lyricsense::LyricsAnalysis;
use lyricsense_test_utils::{sample_lyrics, WELL_FORMED_COMPLETION};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Submits three distinct lyrics and returns the ids in submission order.
async fn submit_three(app: &TestApp) -> Result<Vec<i64>> {
    let mut ids = Vec::new();
    for seed in ["first", "second", "third"] {
        let analysis: LyricsAnalysis = app
            .post_analyze(&json!({ "lyrics": sample_lyrics(seed, 64) }))
            .await?
            .json()
            .await?;
        ids.push(analysis.id);
    }
    Ok(ids)
}

#[tokio::test]
async fn test_get_analysis_by_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    let _mock = app.mock_completion(WELL_FORMED_COMPLETION);

    let created: LyricsAnalysis = app
        .post_analyze(&json!({ "lyrics": sample_lyrics("lookup", 70), "artist": "Someone" }))
        .await?
        .json()
        .await?;

    let response = app.get(&format!("/api/analysis/{}", created.id)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: LyricsAnalysis = response.json().await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn test_unknown_or_malformed_id_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;

    for path in ["/api/analysis/999", "/api/analysis/not-a-number", "/api/analysis/-1"] {
        let response = app.get(path).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "path {path}");
        let body: Value = response.json().await?;
        assert_eq!(body["error"], "Analysis not found");
    }
    Ok(())
}

#[tokio::test]
async fn test_recent_is_newest_first_and_limited() -> Result<()> {
    let app = TestApp::spawn().await?;
    let _mock = app.mock_completion(WELL_FORMED_COMPLETION);
    let ids = submit_three(&app).await?;

    let recent: Vec<LyricsAnalysis> = app.get("/api/recent?limit=2").await?.json().await?;
    let recent_ids: Vec<i64> = recent.iter().map(|a| a.id).collect();
    assert_eq!(recent_ids, vec![ids[2], ids[1]]);

    let all: Vec<LyricsAnalysis> = app.get("/api/recent").await?.json().await?;
    let all_ids: Vec<i64> = all.iter().map(|a| a.id).collect();
    assert_eq!(all_ids, vec![ids[2], ids[1], ids[0]]);
    Ok(())
}

#[tokio::test]
async fn test_recent_limit_edge_cases() -> Result<()> {
    let app = TestApp::spawn().await?;
    let _mock = app.mock_completion(WELL_FORMED_COMPLETION);
    submit_three(&app).await?;

    let none: Vec<Value> = app.get("/api/recent?limit=0").await?.json().await?;
    assert!(none.is_empty());

    let response = app.get("/api/recent?limit=abc").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let fallback: Vec<Value> = response.json().await?;
    assert_eq!(fallback.len(), 3);

    let more: Vec<Value> = app.get("/api/recent?limit=50").await?.json().await?;
    assert_eq!(more.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_recent_on_an_empty_store() -> Result<()> {
    let app = TestApp::spawn().await?;
    let response = app.get("/api/recent").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<Value> = response.json().await?;
    assert!(body.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_root_and_health_endpoints() -> Result<()> {
    let app = TestApp::spawn().await?;

    let root = app.get("/").await?;
    assert_eq!(root.status(), StatusCode::OK);
    assert!(root.text().await?.contains("running"));

    let health = app.get("/health").await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await?, "OK");
    Ok(())
}
