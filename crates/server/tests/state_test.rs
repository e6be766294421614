//! # Application State Tests
//!
//! Startup checks performed while building `AppState` from the configuration.

use lyricsense_server::{
    config::AppConfig,
    state::{build_app_state, build_app_state_with_provider},
};
use lyricsense_test_utils::{sample_lyrics, MockAiProvider, WELL_FORMED_COMPLETION};
use serde_json::json;

#[test]
fn test_unsupported_provider_is_a_startup_error() {
    let mut config = AppConfig::default();
    config.provider.provider = "huggingface".to_string();

    let err = build_app_state(config).err().expect("provider should be rejected");
    assert!(err.to_string().contains("huggingface"));
}

#[test]
fn test_missing_api_key_is_not_a_startup_error() {
    let mut config = AppConfig::default();
    config.provider.api_key = None;
    assert!(build_app_state(config).is_ok());
}

#[test]
fn test_prompt_template_must_keep_the_lyrics_placeholder() {
    let mut config = AppConfig::default();
    config.analysis.prompt_template = Some("Analyze these lyrics.".to_string());

    let result = build_app_state_with_provider(config, Box::new(MockAiProvider::new()));
    let err = result.err().expect("template should be rejected");
    assert!(err.to_string().contains("{lyrics}"));
}

#[tokio::test]
async fn test_store_is_shared_with_the_analyzer() -> anyhow::Result<()> {
    let mut config = AppConfig::default();
    config.store.max_entries = Some(1);
    let provider = MockAiProvider::with_default(WELL_FORMED_COMPLETION);
    let state = build_app_state_with_provider(config, Box::new(provider.clone()))?;

    for seed in ["one", "two"] {
        state
            .analyzer
            .analyze(&json!({ "lyrics": sample_lyrics(seed, 60) }))
            .await?;
    }

    assert_eq!(provider.call_count(), 2);
    assert_eq!(state.store.len().await, 1);
    let recent = state.analyzer.get_recent(None).await;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, 2);
    Ok(())
}
