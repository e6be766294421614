pub mod gemini;

use crate::errors::AnalysisError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with an AI provider.
///
/// The contract is deliberately loose: a prompt goes in, free text comes out.
/// Nothing about the structure of the reply is guaranteed.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Returns a short name for the provider, used in logs.
    fn name(&self) -> &str;

    /// Sends a single prompt and returns the completion text.
    async fn generate(&self, prompt: &str) -> Result<String, AnalysisError>;
}

dyn_clone::clone_trait_object!(AiProvider);
