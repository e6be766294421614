use crate::{
    cache::ContentCache,
    errors::AnalysisError,
    extractor::{extract_analysis, ExtractorOptions},
    hashing::content_hash,
    prompts::{build_analysis_prompt, DEFAULT_ANALYSIS_PROMPT, MAX_PROMPT_LYRICS_CHARS},
    providers::{
        ai::AiProvider,
        db::{AnalysisStore, MemoryStore, DEFAULT_RECENT_LIMIT},
    },
    types::{AnalysisOutcome, LyricsAnalysis},
    validation::{validate_request, MIN_LYRICS_CHARS},
};
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{debug, info};

/// Runs the analyze flow: validate, look up the cache, call the provider on a
/// miss, extract the sections, store the record and index its hash.
pub struct LyricsAnalyzer {
    ai_provider: Box<dyn AiProvider>,
    store: Arc<dyn AnalysisStore>,
    cache: ContentCache,
    prompt_template: String,
    min_lyrics_chars: usize,
    max_prompt_chars: usize,
    extractor_options: ExtractorOptions,
}

impl fmt::Debug for LyricsAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LyricsAnalyzer")
            .field("ai_provider", &self.ai_provider.name())
            .field("store", &self.store.name())
            .field("min_lyrics_chars", &self.min_lyrics_chars)
            .field("max_prompt_chars", &self.max_prompt_chars)
            .finish_non_exhaustive()
    }
}

/// A builder for creating `LyricsAnalyzer` instances.
#[derive(Default)]
pub struct LyricsAnalyzerBuilder {
    ai_provider: Option<Box<dyn AiProvider>>,
    store: Option<Arc<dyn AnalysisStore>>,
    prompt_template: Option<String>,
    min_lyrics_chars: Option<usize>,
    max_prompt_chars: Option<usize>,
    extractor_options: ExtractorOptions,
}

impl LyricsAnalyzerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the AI provider. Required.
    pub fn ai_provider(mut self, provider: Box<dyn AiProvider>) -> Self {
        self.ai_provider = Some(provider);
        self
    }

    /// Sets the store. Defaults to an unbounded [`MemoryStore`].
    pub fn store(mut self, store: Arc<dyn AnalysisStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the default prompt. The template must contain `{lyrics}`.
    pub fn prompt_template(mut self, template: String) -> Self {
        self.prompt_template = Some(template);
        self
    }

    pub fn min_lyrics_chars(mut self, min: usize) -> Self {
        self.min_lyrics_chars = Some(min);
        self
    }

    pub fn max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = Some(max);
        self
    }

    pub fn extractor_options(mut self, options: ExtractorOptions) -> Self {
        self.extractor_options = options;
        self
    }

    pub fn build(self) -> Result<LyricsAnalyzer, AnalysisError> {
        let ai_provider = self.ai_provider.ok_or(AnalysisError::MissingAiProvider)?;
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn AnalysisStore>);

        Ok(LyricsAnalyzer {
            ai_provider,
            cache: ContentCache::new(store.clone()),
            store,
            prompt_template: self
                .prompt_template
                .unwrap_or_else(|| DEFAULT_ANALYSIS_PROMPT.to_string()),
            min_lyrics_chars: self.min_lyrics_chars.unwrap_or(MIN_LYRICS_CHARS),
            max_prompt_chars: self.max_prompt_chars.unwrap_or(MAX_PROMPT_LYRICS_CHARS),
            extractor_options: self.extractor_options,
        })
    }
}

impl LyricsAnalyzer {
    /// Analyzes a raw submission body.
    ///
    /// A validation failure returns before the cache, the store or the provider
    /// are touched. Identical lyrics are served the first stored record.
    pub async fn analyze(&self, body: &Value) -> Result<AnalysisOutcome, AnalysisError> {
        let request =
            validate_request(body, self.min_lyrics_chars).map_err(AnalysisError::Validation)?;
        let hash = content_hash(&request.lyrics);

        if let Some(analysis) = self.cache.lookup_hash(&hash).await {
            info!(id = analysis.id, "Cache hit for submitted lyrics.");
            return Ok(AnalysisOutcome {
                analysis,
                cached: true,
            });
        }

        let _guard = self.cache.lock(&hash).await;

        // Another request may have finished the same lyrics while we waited.
        if let Some(analysis) = self.cache.lookup_hash(&hash).await {
            info!(id = analysis.id, "Cache hit after waiting for in-flight analysis.");
            return Ok(AnalysisOutcome {
                analysis,
                cached: true,
            });
        }

        info!(
            provider = self.ai_provider.name(),
            lyrics_chars = request.lyrics.chars().count(),
            "Cache miss, requesting analysis from AI provider."
        );
        let prompt = build_analysis_prompt(
            &self.prompt_template,
            &request.lyrics,
            self.max_prompt_chars,
        );
        let completion = self.ai_provider.generate(&prompt).await?;
        debug!("<-- Completion from AI: {}", completion);

        let extracted = extract_analysis(&completion, &self.extractor_options);
        let analysis = self
            .store
            .create_analysis(extracted.into_new_analysis(request))
            .await;
        self.cache.record(&hash, analysis.id).await;
        info!(id = analysis.id, "Stored new analysis.");

        Ok(AnalysisOutcome {
            analysis,
            cached: false,
        })
    }

    pub async fn get_by_id(&self, id: i64) -> Option<LyricsAnalysis> {
        self.store.get_by_id(id).await
    }

    /// Returns the most recent analyses, [`DEFAULT_RECENT_LIMIT`] when `limit` is `None`.
    pub async fn get_recent(&self, limit: Option<usize>) -> Vec<LyricsAnalysis> {
        self.store
            .get_recent(limit.unwrap_or(DEFAULT_RECENT_LIMIT))
            .await
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn AnalysisStore> {
        &self.store
    }
}
