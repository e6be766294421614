use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lyricsense::AnalysisError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors originating from the analysis pipeline.
    Analysis(AnalysisError),
    /// A requested record does not exist.
    NotFound(String),
}

/// Conversion from `AnalysisError` to `AppError`.
impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, body) = match self {
            AppError::Analysis(AnalysisError::Validation(details)) => {
                warn!(?details, "Rejected invalid analysis request.");
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Invalid request data", "details": details }),
                )
            }
            AppError::Analysis(err) => {
                // Log the original error for debugging purposes
                error!("AnalysisError: {:?}", err);
                let message = match &err {
                    AnalysisError::MissingApiKey | AnalysisError::MissingAiProvider => {
                        format!("Server is not configured correctly: {err}")
                    }
                    _ => err.to_string(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
        };

        (status_code, Json(body)).into_response()
    }
}
