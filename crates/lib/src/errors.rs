use crate::types::FieldError;
use thiserror::Error;

/// Custom error types for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid request data")]
    Validation(Vec<FieldError>),
    #[error("AI provider is not configured")]
    MissingAiProvider,
    #[error("GOOGLE_API_KEY is not set in the environment")]
    MissingApiKey,
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    ProviderRequest(reqwest::Error),
    #[error("AI provider returned an error: {status} {body}")]
    ProviderApi { status: u16, body: String },
}
