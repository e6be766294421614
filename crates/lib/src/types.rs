//! # Domain Types
//!
//! The request, record and item shapes exchanged between the analyzer, the
//! store and the HTTP layer. All of them serialize with camelCase keys so the
//! JSON matches what the browser form sends and renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single titled finding with an icon, rendered as one card in the results panel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub title: String,
    pub description: String,
    /// An emoji scraped from the completion, or a fixed fallback glyph.
    pub icon: String,
}

/// A cultural, historical or literary reference found in the lyrics.
pub type Reference = Insight;

/// A curiosity about how the song was composed.
pub type Curiosity = Insight;

/// A validated submission. Transient: it is never stored as-is.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub lyrics: String,
    #[serde(default)]
    pub song_title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
}

/// The fields of an analysis before the store assigns an id and a timestamp.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewAnalysis {
    pub lyrics: String,
    pub song_title: Option<String>,
    pub artist: Option<String>,
    pub references: Vec<Reference>,
    pub curiosities: Vec<Curiosity>,
    pub author_intention: String,
}

/// A stored analysis. Immutable once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LyricsAnalysis {
    pub id: i64,
    pub lyrics: String,
    pub song_title: Option<String>,
    pub artist: Option<String>,
    pub references: Vec<Reference>,
    pub curiosities: Vec<Curiosity>,
    pub author_intention: String,
    pub created_at: DateTime<Utc>,
}

impl LyricsAnalysis {
    pub(crate) fn from_new(id: i64, created_at: DateTime<Utc>, new: NewAnalysis) -> Self {
        Self {
            id,
            lyrics: new.lyrics,
            song_title: new.song_title,
            artist: new.artist,
            references: new.references,
            curiosities: new.curiosities,
            author_intention: new.author_intention,
            created_at,
        }
    }
}

/// A single validation failure, addressed by the path of the offending field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            path: vec![field.to_string()],
            message: message.into(),
        }
    }
}

/// The result of an analyze call, and whether it was served from the cache.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: LyricsAnalysis,
    pub cached: bool,
}
