//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The store and the analyzer are constructed once
//! here and handed to every handler through axum's `State` extractor.

use crate::config::AppConfig;
use lyricsense::{
    extractor::ExtractorOptions,
    providers::{
        ai::{
            gemini::{gemini_api_url, GeminiProvider},
            AiProvider,
        },
        db::{AnalysisStore, MemoryStore},
    },
    LyricsAnalyzer, LyricsAnalyzerBuilder,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The in-memory store holding every analysis computed by this process.
    pub store: Arc<dyn AnalysisStore>,
    /// The analyze pipeline, sharing `store`.
    pub analyzer: Arc<LyricsAnalyzer>,
}

/// Instantiates the AI provider named in the configuration.
///
/// A missing API key is not an error here; it surfaces on the first request.
pub fn build_ai_provider(config: &AppConfig) -> anyhow::Result<Box<dyn AiProvider>> {
    let provider_config = &config.provider;
    match provider_config.provider.as_str() {
        "gemini" => {
            let api_url = provider_config
                .api_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| gemini_api_url(&provider_config.model_name));
            if provider_config.api_key.is_none() {
                warn!("No Gemini API key configured. Analyze requests will fail until GOOGLE_API_KEY is set.");
            }
            info!(api_url = %api_url, "Configured Gemini provider.");
            Ok(Box::new(GeminiProvider::new(
                api_url,
                provider_config.api_key.clone(),
            )?))
        }
        other => Err(anyhow::anyhow!("Unsupported AI provider type '{other}'")),
    }
}

/// Builds the shared application state from the configuration.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = build_ai_provider(&config)?;
    build_app_state_with_provider(config, ai_provider)
}

/// Builds the application state around an already constructed provider.
pub fn build_app_state_with_provider(
    config: AppConfig,
    ai_provider: Box<dyn AiProvider>,
) -> anyhow::Result<AppState> {
    let store: Arc<dyn AnalysisStore> =
        Arc::new(MemoryStore::from_max_entries(config.store.max_entries));
    info!(max_entries = ?config.store.max_entries, "Initialized in-memory analysis store.");

    let mut builder = LyricsAnalyzerBuilder::new()
        .ai_provider(ai_provider)
        .store(store.clone())
        .min_lyrics_chars(config.analysis.min_lyrics_chars)
        .max_prompt_chars(config.analysis.max_prompt_chars)
        .extractor_options(ExtractorOptions {
            max_sentences: config.analysis.max_sentences,
        });
    if let Some(template) = &config.analysis.prompt_template {
        if !template.contains("{lyrics}") {
            return Err(anyhow::anyhow!(
                "analysis.prompt_template must contain the {{lyrics}} placeholder"
            ));
        }
        builder = builder.prompt_template(template.clone());
    }

    Ok(AppState {
        store,
        analyzer: Arc::new(builder.build()?),
    })
}
