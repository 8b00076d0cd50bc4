//! Quiz generation with fallback to the static question bank.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use lectern_core::questions::fallback_questions;
use lectern_core::GenerationError;

use super::ResponseStatus;
use crate::{errors::AppError, state::AppState};

/// Lecture used by the smoke-test route.
pub const SAMPLE_LECTURE: &str = "Introduction to Machine Learning";
pub const SAMPLE_COURSE: &str = "Computer Science 101";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizRequest {
    pub lecture_title: String,
    pub course_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub questions: Vec<String>,
}

/// Generate questions for a lecture. Never fails: any generation error is
/// reported as a warning alongside the static bank's questions.
pub async fn quiz_for(state: &AppState, lecture_title: &str, course_name: &str) -> QuizResponse {
    let generated = match &state.question_source {
        Some(source) => source.generate(course_name, lecture_title).await,
        None => Err(GenerationError::Unavailable),
    };

    match generated {
        Ok(questions) => {
            info!(
                lecture = lecture_title,
                count = questions.len(),
                "generated quiz"
            );
            QuizResponse {
                status: ResponseStatus::Success,
                message: None,
                questions,
            }
        }
        Err(e) => {
            warn!(lecture = lecture_title, "falling back to static questions: {e}");
            QuizResponse {
                status: ResponseStatus::Warning,
                message: Some(format!("Using fallback questions: {e}")),
                questions: fallback_questions(lecture_title, course_name),
            }
        }
    }
}

async fn generate_quiz(
    State(state): State<AppState>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, AppError> {
    let Json(request) = payload.map_err(|r| AppError::InvalidQuizRequest(r.body_text()))?;
    info!(
        lecture = %request.lecture_title,
        course = %request.course_name,
        "quiz requested"
    );
    Ok(Json(
        quiz_for(&state, &request.lecture_title, &request.course_name).await,
    ))
}

async fn test_generate_quiz(State(state): State<AppState>) -> Json<QuizResponse> {
    Json(quiz_for(&state, SAMPLE_LECTURE, SAMPLE_COURSE).await)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/generate-quiz", post(generate_quiz))
        .route("/test-generate-quiz", get(test_generate_quiz))
}
