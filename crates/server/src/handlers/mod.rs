//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `lyricsense-server`.

pub mod analysis;
pub mod general;

pub use analysis::*;
pub use general::*;

// Shared items used by multiple handler modules.
use super::{errors::AppError, state::AppState};
