use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use lectern_core::questions::fallback_questions;
use lectern_core::AnalysisError;

/// Message returned when question and answer counts differ.
pub const LENGTH_MISMATCH_MESSAGE: &str = "Number of questions and answers must match";

/// Lecture and course used for the fallback quiz when the request itself
/// could not be read.
const UNKNOWN_LECTURE: &str = "Unknown Topic";
const UNKNOWN_COURSE: &str = "General Course";

/// Application-wide error type
#[derive(Debug)]
pub enum AppError {
    /// The quiz request body could not be read.
    InvalidQuizRequest(String),
    /// The analysis request body could not be read.
    InvalidAnalysisRequest(String),
    Analysis(AnalysisError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidQuizRequest(msg) => write!(f, "Invalid quiz request: {}", msg),
            AppError::InvalidAnalysisRequest(msg) => {
                write!(f, "Invalid analysis request: {}", msg)
            }
            AppError::Analysis(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            // A usable quiz is always returned, even for unreadable requests.
            AppError::InvalidQuizRequest(_) => {
                tracing::warn!("{}", message);
                let body = Json(json!({
                    "status": "error",
                    "message": message,
                    "questions": fallback_questions(UNKNOWN_LECTURE, UNKNOWN_COURSE),
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::InvalidAnalysisRequest(_) => {
                tracing::warn!("{}", message);
                let body = Json(json!({
                    "status": "error",
                    "message": message,
                    "results": [],
                }));
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
            AppError::Analysis(AnalysisError::LengthMismatch { .. }) => {
                tracing::warn!("Rejected analysis request: {}", message);
                let body = Json(json!({
                    "status": "error",
                    "message": LENGTH_MISMATCH_MESSAGE,
                    "results": [],
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        AppError::Analysis(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let mismatch = AppError::from(AnalysisError::LengthMismatch {
            questions: 2,
            answers: 1,
        });
        assert_eq!(mismatch.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidQuizRequest("missing field".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::InvalidAnalysisRequest("missing field".into())
                .into_response()
                .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
