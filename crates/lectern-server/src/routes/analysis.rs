//! Batch answer analysis.

use std::any::Any;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::{error, info};

use lectern_core::{analyze_batch, AnalysisResult};

use super::ResponseStatus;
use crate::{errors::AppError, state::AppState};

/// Questions and answers are paired by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub lecture_title: String,
    pub course_name: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub status: ResponseStatus,
    pub overall_score: f64,
    pub results: Vec<AnalysisResult>,
}

impl AnalysisRequest {
    /// Grade every answer.
    pub fn grade(&self) -> Result<AnalysisResponse, AppError> {
        let batch = analyze_batch(
            &self.lecture_title,
            &self.course_name,
            &self.questions,
            &self.answers,
        )?;
        Ok(AnalysisResponse {
            status: ResponseStatus::Success,
            overall_score: batch.overall_score,
            results: batch.results,
        })
    }
}

async fn analyze_answers(
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let Json(request) = payload.map_err(|r| AppError::InvalidAnalysisRequest(r.body_text()))?;
    info!(
        lecture = %request.lecture_title,
        answers = request.answers.len(),
        "analyzing answers"
    );
    Ok(Json(request.grade()?))
}

/// Turns a handler panic into the analysis error body.
fn analysis_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!("answer analysis panicked: {detail}");

    let body = Json(serde_json::json!({
        "status": "error",
        "message": format!("Failed to analyze answers: {detail}"),
        "results": [],
    }));
    (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/analyze-answers",
        post(analyze_answers).layer(CatchPanicLayer::custom(analysis_panic)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_become_error_bodies() {
        let response = analysis_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = analysis_panic(Box::new(String::from("index out of bounds")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn grade_pairs_by_position() {
        let request = AnalysisRequest {
            lecture_title: "Intro to Python".into(),
            course_name: "CS1".into(),
            questions: vec![
                "Describe the difference between lists and tuples in Python.".into(),
                "Explain how exception handling works in Python.".into(),
            ],
            answers: vec![
                "Lists are mutable and use brackets, tuples are immutable and use parentheses, so you cannot modify a tuple.".into(),
                String::new(),
            ],
        };
        let response = request.grade().unwrap();
        assert_eq!(response.results.len(), 2);
        assert!(response.results[0].is_correct);
        assert!(!response.results[1].is_correct);
        assert_eq!(response.overall_score, 50.0);
    }
}
