//! Static question bank and parsing of generated question lists.
//!
//! The bank is the fallback whenever the question generator is missing or
//! fails, so it must always produce a usable list.

use tracing::debug;

use crate::error::GenerationError;
use crate::keywords::{Fields, LoweredText, Trigger};
use crate::model::Topic;

/// Number of questions in a quiz.
pub const QUIZ_LENGTH: usize = 5;

/// Topic triggers for the question bank, in priority order. Only the lecture
/// title and course name are available when a quiz is requested.
static BANK_TRIGGERS: &[(Topic, &[Trigger])] = &[
    (
        Topic::Python,
        &[Trigger::new("python", Fields::LECTURE_OR_COURSE)],
    ),
    (
        Topic::MachineLearning,
        &[Trigger::new("machine learning", Fields::LECTURE_OR_COURSE)],
    ),
    (
        Topic::NeuralNetworks,
        &[
            Trigger::new("neural", Fields::LECTURE),
            Trigger::new("deep learning", Fields::COURSE),
        ],
    ),
    (
        Topic::DataAnalytics,
        &[
            Trigger::new("data", Fields::LECTURE),
            Trigger::new("analytics", Fields::COURSE),
        ],
    ),
];

const PYTHON_QUESTIONS: [&str; QUIZ_LENGTH] = [
    "Explain the key features of Python that make it popular for beginners.",
    "How does Python handle variable declarations differently from languages like Java or C++?",
    "Describe the difference between lists and tuples in Python.",
    "What are Python modules and packages? How do they help with code organization?",
    "Explain how exception handling works in Python with try/except blocks.",
];

const MACHINE_LEARNING_QUESTIONS: [&str; QUIZ_LENGTH] = [
    "What is machine learning and how does it differ from traditional programming?",
    "Explain the difference between supervised and unsupervised learning.",
    "What is the purpose of splitting data into training and test sets?",
    "Describe the concept of overfitting and how to prevent it.",
    "What are some common evaluation metrics for machine learning models?",
];

const NEURAL_NETWORK_QUESTIONS: [&str; QUIZ_LENGTH] = [
    "Explain the basic structure of a neural network.",
    "What is the role of activation functions in neural networks?",
    "How do convolutional neural networks (CNNs) differ from regular neural networks?",
    "What is backpropagation and why is it important for training neural networks?",
    "Describe the concept of transfer learning in deep learning.",
];

const DATA_ANALYTICS_QUESTIONS: [&str; QUIZ_LENGTH] = [
    "What are the key steps in a typical data analysis workflow?",
    "Explain the difference between descriptive and inferential statistics.",
    "How do you handle missing data in a dataset?",
    "What is feature engineering and why is it important?",
    "Describe different visualization techniques and when you would use each one.",
];

/// Pick the bank topic for a lecture.
pub fn lecture_topic(lecture_title: &str, course_name: &str) -> Topic {
    let text = LoweredText::new("", lecture_title, course_name);
    BANK_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| t.fires(&text)))
        .map_or(Topic::General, |(topic, _)| *topic)
}

/// The static questions for a lecture. Never empty.
pub fn fallback_questions(lecture_title: &str, course_name: &str) -> Vec<String> {
    let topic = lecture_topic(lecture_title, course_name);
    debug!(%topic, lecture = lecture_title, "using static question bank");
    topic_questions(topic, lecture_title, course_name)
}

/// The static questions for a topic. `General` questions are templated on the
/// lecture title and course name as given.
pub fn topic_questions(topic: Topic, lecture_title: &str, course_name: &str) -> Vec<String> {
    let fixed = match topic {
        Topic::Python => &PYTHON_QUESTIONS,
        Topic::MachineLearning => &MACHINE_LEARNING_QUESTIONS,
        Topic::NeuralNetworks => &NEURAL_NETWORK_QUESTIONS,
        Topic::DataAnalytics => &DATA_ANALYTICS_QUESTIONS,
        Topic::General => {
            return vec![
                format!("Explain the core concepts of {lecture_title}."),
                format!("How does {lecture_title} relate to other topics in {course_name}?"),
                format!("What are the practical applications of {lecture_title}?"),
                format!(
                    "Describe the challenges students often face when learning about {lecture_title}."
                ),
                format!("How has the field of {lecture_title} evolved over time?"),
            ]
        }
    };
    fixed.iter().map(|q| q.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Generated output parsing
// ---------------------------------------------------------------------------

/// Parse an LLM response into a list of questions.
///
/// Handles:
/// - A bare JSON array of strings
/// - An array surrounded by prose or markdown fences (the span from the first
///   `[` to the last `]` is tried)
///
/// Empty arrays and arrays containing non-strings are rejected.
pub fn parse_question_list(raw: &str) -> Result<Vec<String>, GenerationError> {
    let trimmed = raw.trim();

    let parsed = serde_json::from_str::<Vec<String>>(trimmed).or_else(|direct_err| {
        match bracketed_span(trimmed) {
            Some(span) if span.len() < trimmed.len() => serde_json::from_str::<Vec<String>>(span)
                .map_err(|e| GenerationError::MalformedOutput(e.to_string())),
            _ => Err(GenerationError::MalformedOutput(direct_err.to_string())),
        }
    })?;

    let questions: Vec<String> = parsed
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(GenerationError::MalformedOutput(
            "generator returned no questions".to_string(),
        ));
    }
    Ok(questions)
}

/// The text from the first `[` to the last `]`, inclusive.
fn bracketed_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}
