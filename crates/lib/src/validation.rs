//! # Request Validation
//!
//! Turns a raw JSON body into an [`AnalysisRequest`]. Every violation is
//! collected so the client sees all of them at once. Nothing here touches the
//! cache, the store or the AI provider.

use crate::types::{AnalysisRequest, FieldError};
use serde_json::Value;

/// The minimum number of characters accepted in the `lyrics` field.
pub const MIN_LYRICS_CHARS: usize = 50;

/// Validates a submission body.
///
/// Length is counted in Unicode scalar values over the untrimmed string.
/// There is no upper bound; long lyrics are cut when the prompt is built.
pub fn validate_request(
    body: &Value,
    min_chars: usize,
) -> Result<AnalysisRequest, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError {
            path: Vec::new(),
            message: "Expected an object".to_string(),
        }]);
    };

    let mut errors = Vec::new();

    let lyrics = match object.get("lyrics") {
        None | Some(Value::Null) => {
            errors.push(FieldError::new("lyrics", "Required"));
            None
        }
        Some(Value::String(lyrics)) => {
            if lyrics.chars().count() < min_chars {
                errors.push(FieldError::new(
                    "lyrics",
                    format!("Lyrics must be at least {min_chars} characters long"),
                ));
            }
            Some(lyrics.clone())
        }
        Some(_) => {
            errors.push(FieldError::new("lyrics", "Expected string"));
            None
        }
    };

    let song_title = optional_string(object.get("songTitle"), "songTitle", &mut errors);
    let artist = optional_string(object.get("artist"), "artist", &mut errors);

    match lyrics {
        Some(lyrics) if errors.is_empty() => Ok(AnalysisRequest {
            lyrics,
            song_title,
            artist,
        }),
        _ => Err(errors),
    }
}

fn optional_string(
    value: Option<&Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "Expected string"));
            None
        }
    }
}
