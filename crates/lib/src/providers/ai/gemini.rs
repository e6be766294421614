use crate::{errors::AnalysisError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use tracing::{debug, warn};

/// Returned in place of a completion when the provider's reply carries no text.
pub const COMPLETION_UNAVAILABLE: &str = "Analysis not available.";

/// The default model used to build the endpoint URL.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Builds the `generateContent` endpoint for a Gemini model.
pub fn gemini_api_url(model_name: &str) -> String {
    format!("https://generativelanguage.googleapis.com/v1/models/{model_name}:generateContent")
}

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<ContentResponse>,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|text| !text.trim().is_empty())
    }
}

// --- Gemini Provider implementation ---

/// A provider for interacting with the Google Gemini API.
///
/// The API key is optional at construction time. A missing key only fails the
/// request that needs it, before any network traffic.
#[derive(Clone)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("api_url", &self.api_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider`.
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, AnalysisError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(AnalysisError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key: api_key.filter(|key| !key.is_empty()),
        })
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_ref().ok_or(AnalysisError::MissingApiKey)?;

        let request_body = GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        debug!(prompt_chars = prompt.chars().count(), "--> Sending prompt to Gemini");

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(AnalysisError::ProviderRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::ProviderApi {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(AnalysisError::ProviderRequest)?;

        let text = match serde_json::from_str::<GeminiResponse>(&body) {
            Ok(parsed) => parsed.first_text(),
            Err(e) => {
                warn!("Gemini returned a body that could not be parsed: {e}");
                None
            }
        };

        Ok(text.unwrap_or_else(|| {
            warn!("Gemini reply carried no completion text, using placeholder.");
            COMPLETION_UNAVAILABLE.to_string()
        }))
    }
}
