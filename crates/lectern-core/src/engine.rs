//! Answer analysis engine.
//!
//! Ties together keyword resolution, scoring, and feedback for single answers
//! and for whole quizzes. Everything here is pure: no I/O, no shared state,
//! and every input produces a result.

use tracing::debug;

use crate::error::AnalysisError;
use crate::keywords;
use crate::model::{AnalysisResult, AnswerQuery, BatchResult};
use crate::scoring::{is_blank, Feedback, Score};

/// Grade a single answer.
pub fn analyze_answer(query: &AnswerQuery) -> AnalysisResult {
    if is_blank(&query.answer) {
        return AnalysisResult {
            is_correct: false,
            score: 0,
            feedback: Feedback::NoAnswer.message().to_string(),
            question: query.question.clone(),
            answer: query.answer.clone(),
            matched_keyword_count: 0,
            expected_keyword_count: 0,
        };
    }

    let expected = keywords::resolve(&query.question, &query.lecture_title, &query.course_name);
    let score = Score::compute(&query.answer, &expected);
    let feedback = Feedback::select(score.value, score.length_adequate);

    AnalysisResult {
        is_correct: score.is_correct,
        score: score.value,
        feedback: feedback.message().to_string(),
        question: query.question.clone(),
        answer: query.answer.clone(),
        matched_keyword_count: score.matched,
        expected_keyword_count: expected.len(),
    }
}

/// Grade a quiz. `questions[i]` is paired with `answers[i]`.
pub fn analyze_batch(
    lecture_title: &str,
    course_name: &str,
    questions: &[String],
    answers: &[String],
) -> Result<BatchResult, AnalysisError> {
    if questions.len() != answers.len() {
        return Err(AnalysisError::LengthMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }

    let results: Vec<AnalysisResult> = questions
        .iter()
        .zip(answers)
        .map(|(question, answer)| {
            analyze_answer(&AnswerQuery::new(
                question.as_str(),
                answer.as_str(),
                lecture_title,
                course_name,
            ))
        })
        .collect();

    let overall_score = overall_score(&results);
    debug!(
        lecture = lecture_title,
        answers = results.len(),
        overall_score,
        "analyzed quiz answers"
    );

    Ok(BatchResult {
        overall_score,
        results,
    })
}

/// Percentage of results judged correct; 0.0 for an empty quiz.
pub fn overall_score(results: &[AnalysisResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let correct = results.iter().filter(|r| r.is_correct).count();
    correct as f64 / results.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ML_QUESTION: &str =
        "What is machine learning and how does it differ from traditional programming?";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn machine_learning_scenario_is_excellent() {
        let query = AnswerQuery::new(
            ML_QUESTION,
            "Machine learning uses data and algorithms to learn patterns instead of explicit programming rules.",
            "Intro to ML",
            "CS101",
        );
        let result = analyze_answer(&query);
        assert_eq!(result.expected_keyword_count, 6);
        assert_eq!(result.matched_keyword_count, 6);
        assert_eq!(result.score, 100);
        assert!(result.is_correct);
        assert_eq!(result.feedback, Feedback::Excellent.message());
        assert_eq!(result.answer, query.answer);
    }

    #[test]
    fn terse_answer_gets_too_brief_feedback() {
        let result = analyze_answer(&AnswerQuery::new(ML_QUESTION, "idk", "Intro to ML", "CS101"));
        assert_eq!(result.score, 0);
        assert!(!result.is_correct);
        assert_eq!(result.matched_keyword_count, 0);
        assert_eq!(result.expected_keyword_count, 6);
        assert_eq!(result.feedback, Feedback::TooBrief.message());
    }

    #[test]
    fn blank_answer_short_circuits() {
        let result = analyze_answer(&AnswerQuery::new(ML_QUESTION, "  ", "Intro to ML", "CS101"));
        assert_eq!(result.score, 0);
        assert!(!result.is_correct);
        assert_eq!(result.feedback, Feedback::NoAnswer.message());
        assert_eq!(result.expected_keyword_count, 0);
        assert_eq!(result.answer, "  ");
    }

    #[test]
    fn keywordless_topic_grades_on_length() {
        // Machine learning topic fires, but no rule matches the question.
        let answer = "It was popularized in the 1950s by researchers working on checkers programs.";
        let result = analyze_answer(&AnswerQuery::new(
            "Who coined the term?",
            answer,
            "Machine Learning History",
            "CS",
        ));
        assert_eq!(result.expected_keyword_count, 0);
        assert_eq!(result.score, 70);
        assert!(result.is_correct);
        assert_eq!(result.feedback, Feedback::Good.message());
    }

    #[test]
    fn batch_rejects_mismatched_lengths() {
        let err = analyze_batch(
            "Lecture",
            "Course",
            &strings(&["q1", "q2"]),
            &strings(&["a1"]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::LengthMismatch {
                questions: 2,
                answers: 1
            }
        );
    }

    #[test]
    fn batch_of_nothing_scores_zero() {
        let batch = analyze_batch("Lecture", "Course", &[], &[]).unwrap();
        assert_eq!(batch.overall_score, 0.0);
        assert!(batch.results.is_empty());
    }

    #[test]
    fn batch_preserves_order_and_computes_percentage() {
        let questions = strings(&[ML_QUESTION, ML_QUESTION, "Explain overfitting."]);
        let answers = strings(&[
            "Machine learning uses data and algorithms to learn patterns instead of explicit programming rules.",
            "",
            "no idea",
        ]);
        let batch = analyze_batch("Intro to ML", "CS101", &questions, &answers).unwrap();

        assert_eq!(batch.results.len(), 3);
        assert_eq!(batch.results[1].answer, "");
        assert_eq!(batch.results[2].question, "Explain overfitting.");
        assert_eq!(batch.correct_count(), 1);
        assert!((batch.overall_score - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn overall_score_is_percentage_of_correct() {
        let questions = strings(&["Explain the core concepts of Rust ownership."; 4]);
        let long = "Rust ownership is a core idea, and concepts like borrowing build on ownership.";
        let answers = strings(&[long, long, "", "short"]);
        let batch = analyze_batch("Rust Ownership", "Systems", &questions, &answers).unwrap();
        assert_eq!(batch.correct_count(), 2);
        assert_eq!(batch.overall_score, 50.0);
    }
}
