use std::sync::Arc;

use lectern_core::traits::QuestionSource;

/// Application state shared across all handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// `None` when no provider is configured; quizzes then come from the
    /// static question bank.
    pub question_source: Option<Arc<dyn QuestionSource>>,
}

impl AppState {
    pub fn new(question_source: Option<Arc<dyn QuestionSource>>) -> Self {
        Self { question_source }
    }

    /// State with no question source.
    pub fn offline() -> Self {
        Self::default()
    }
}
