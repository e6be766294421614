//! # Lyrics Analysis
//!
//! This crate turns submitted song lyrics into a short analysis (references,
//! curiosities and the author's intention) by prompting a configurable AI
//! provider and scraping its free-text reply. Results are kept in an
//! in-memory store and deduplicated by the SHA-256 of the lyrics.

pub mod analyzer;
pub mod cache;
pub mod errors;
pub mod extractor;
pub mod hashing;
pub mod prompts;
pub mod providers;
pub mod types;
pub mod validation;

pub use analyzer::{LyricsAnalyzer, LyricsAnalyzerBuilder};
pub use errors::AnalysisError;
pub use types::{
    AnalysisOutcome, AnalysisRequest, Curiosity, FieldError, Insight, LyricsAnalysis,
    NewAnalysis, Reference,
};
