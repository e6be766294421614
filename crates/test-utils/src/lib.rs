use async_trait::async_trait;
use lyricsense::errors::AnalysisError;
use lyricsense::providers::ai::AiProvider;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock AI Provider ---

/// A scripted provider that records every prompt it receives.
#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    default_response: Arc<Mutex<String>>,
    failure: Arc<Mutex<Option<(u16, String)>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(String::new())),
            failure: Arc::new(Mutex::new(None)),
            delay: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider that answers every prompt with `response`.
    pub fn with_default(response: &str) -> Self {
        let provider = Self::new();
        provider.set_default_response(response);
        provider
    }

    /// Pre-programs a response for prompts containing `key`.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    pub fn set_default_response(&self, response: &str) {
        *self.default_response.lock().unwrap() = response.to_string();
    }

    /// Makes every call fail as if the provider returned `status` with `body`.
    pub fn fail_with(&self, status: u16, body: &str) {
        *self.failure.lock().unwrap() = Some((status, body.to_string()));
    }

    /// Makes every call sleep for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Retrieves the recorded prompts for assertion.
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some((status, body)) = self.failure.lock().unwrap().clone() {
            return Err(AnalysisError::ProviderApi { status, body });
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if prompt.contains(key) {
                return Ok(response.clone());
            }
        }
        Ok(self.default_response.lock().unwrap().clone())
    }
}

/// Lyrics of exactly `len` characters, distinct per `seed`.
pub fn sample_lyrics(seed: &str, len: usize) -> String {
    let mut lyrics = format!("{seed} ");
    while lyrics.chars().count() < len {
        lyrics.push_str("la ");
    }
    lyrics.chars().take(len).collect()
}

/// A well-formed completion in the requested format.
pub const WELL_FORMED_COMPLETION: &str = "References: Echoes of Homer's Odyssey and the sea as exile. 🌊
Curiosities: Written in a single night on a borrowed guitar. 🎸
Author's intention: To portray longing for a home that no longer exists. 🏠";
