//! Core data model types for lectern.
//!
//! These are the types that flow between the answer analysis engine, the
//! question bank, and the HTTP layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single student answer to be graded, with the context used to pick
/// the expected keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerQuery {
    /// The quiz question as shown to the student.
    pub question: String,
    /// The student's free-text answer.
    pub answer: String,
    /// Title of the lecture the quiz belongs to.
    pub lecture_title: String,
    /// Name of the course the lecture belongs to.
    pub course_name: String,
}

impl AnswerQuery {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        lecture_title: impl Into<String>,
        course_name: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            lecture_title: lecture_title.into(),
            course_name: course_name.into(),
        }
    }
}

/// The verdict for a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Whether the answer counts as correct.
    pub is_correct: bool,
    /// Score from 0 to 100.
    pub score: u8,
    /// Human-readable feedback for the student.
    pub feedback: String,
    /// The question, echoed back.
    pub question: String,
    /// The answer, echoed back unchanged.
    pub answer: String,
    /// How many expected keywords appeared in the answer.
    #[serde(rename = "matched_keywords")]
    pub matched_keyword_count: usize,
    /// How many keywords were expected.
    #[serde(rename = "expected_keywords_count")]
    pub expected_keyword_count: usize,
}

/// Graded answers for a whole quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Percentage of answers judged correct (0.0 when nothing was submitted).
    pub overall_score: f64,
    /// One result per submitted answer, in submission order.
    pub results: Vec<AnalysisResult>,
}

impl BatchResult {
    /// Number of answers judged correct.
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct).count()
    }
}

/// Subject areas that have dedicated keyword tables and question banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    Python,
    MachineLearning,
    NeuralNetworks,
    DataAnalytics,
    General,
}

impl Topic {
    /// All topics, with `General` last.
    pub const ALL: [Topic; 5] = [
        Topic::Python,
        Topic::MachineLearning,
        Topic::NeuralNetworks,
        Topic::DataAnalytics,
        Topic::General,
    ];
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Python => write!(f, "python"),
            Topic::MachineLearning => write!(f, "machine-learning"),
            Topic::NeuralNetworks => write!(f, "neural-networks"),
            Topic::DataAnalytics => write!(f, "data-analytics"),
            Topic::General => write!(f, "general"),
        }
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" | "py" => Ok(Topic::Python),
            "machine-learning" | "machine learning" | "ml" => Ok(Topic::MachineLearning),
            "neural-networks" | "neural" | "deep-learning" | "deep learning" => {
                Ok(Topic::NeuralNetworks)
            }
            "data-analytics" | "data" | "analytics" => Ok(Topic::DataAnalytics),
            "general" | "generic" => Ok(Topic::General),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}
