//! Keyword-based answer scoring and feedback selection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keywords::KeywordSet;

/// Trimmed answers shorter than this many characters are "too brief".
pub const MIN_ANSWER_CHARS: usize = 50;

/// Answers scoring at least this much are correct.
pub const PASS_SCORE: u8 = 60;

/// Deducted from the keyword score of a brief answer.
pub const BREVITY_PENALTY: u8 = 30;

/// Scores used when no keywords could be determined.
const KEYWORDLESS_ADEQUATE_SCORE: u8 = 70;
const KEYWORDLESS_BRIEF_SCORE: u8 = 30;

/// The numeric outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Score from 0 to 100.
    pub value: u8,
    /// Whether the answer counts as correct.
    pub is_correct: bool,
    /// Expected keywords found in the answer.
    pub matched: usize,
    /// Whether the trimmed answer reached [`MIN_ANSWER_CHARS`].
    pub length_adequate: bool,
}

impl Score {
    /// Grade `answer` against `expected`.
    ///
    /// Blank answers score 0 regardless of the keywords. With no expected
    /// keywords the score depends only on length; otherwise it is the
    /// percentage of keywords present, less [`BREVITY_PENALTY`] for brief
    /// answers.
    pub fn compute(answer: &str, expected: &KeywordSet) -> Self {
        if is_blank(answer) {
            return Self {
                value: 0,
                is_correct: false,
                matched: 0,
                length_adequate: false,
            };
        }

        let length_adequate = is_length_adequate(answer);
        let matched = expected.count_matches(answer);

        if expected.is_empty() {
            let value = if length_adequate {
                KEYWORDLESS_ADEQUATE_SCORE
            } else {
                KEYWORDLESS_BRIEF_SCORE
            };
            return Self {
                value,
                is_correct: length_adequate,
                matched,
                length_adequate,
            };
        }

        let ratio = matched as f64 / expected.len() as f64;
        let mut value = (ratio * 100.0).round().clamp(0.0, 100.0) as u8;
        if !length_adequate {
            value = value.saturating_sub(BREVITY_PENALTY);
        }

        Self {
            value,
            is_correct: value >= PASS_SCORE,
            matched,
            length_adequate,
        }
    }
}

/// `true` for empty or whitespace-only answers.
pub fn is_blank(answer: &str) -> bool {
    answer.trim().is_empty()
}

/// `true` when the trimmed answer has at least [`MIN_ANSWER_CHARS`] characters.
pub fn is_length_adequate(answer: &str) -> bool {
    answer.trim().chars().count() >= MIN_ANSWER_CHARS
}

/// Feedback tiers shown to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    NoAnswer,
    TooBrief,
    Excellent,
    Good,
    Partial,
    NeedsImprovement,
}

impl Feedback {
    /// Pick the feedback tier for a non-blank answer. Brevity takes
    /// precedence over the score.
    pub fn select(score: u8, length_adequate: bool) -> Self {
        if !length_adequate {
            Feedback::TooBrief
        } else if score >= 90 {
            Feedback::Excellent
        } else if score >= 70 {
            Feedback::Good
        } else if score >= 50 {
            Feedback::Partial
        } else {
            Feedback::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::NoAnswer => "No answer provided. Please try to answer the question.",
            Feedback::TooBrief => {
                "Your answer is too brief. Please provide a more detailed explanation."
            }
            Feedback::Excellent => {
                "Excellent answer! You've covered all the key concepts thoroughly."
            }
            Feedback::Good => "Good answer. You've addressed most of the important points.",
            Feedback::Partial => {
                "Partial answer. You've mentioned some relevant concepts, but missed others."
            }
            Feedback::NeedsImprovement => {
                "Your answer needs improvement. Try to include more specific details about key concepts."
            }
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_FILLER: &str =
        "This answer is deliberately long enough to pass the minimum length check.";

    fn keywords(terms: &[&str]) -> KeywordSet {
        KeywordSet::from_terms(terms)
    }

    #[test]
    fn blank_answers_score_zero() {
        for answer in ["", "   ", "\n\t"] {
            let score = Score::compute(answer, &keywords(&["data"]));
            assert_eq!(score.value, 0);
            assert!(!score.is_correct);
            assert_eq!(score.matched, 0);
        }
    }

    #[test]
    fn all_keywords_in_long_answer_is_perfect() {
        let answer = format!("alpha beta gamma. {LONG_FILLER}");
        let score = Score::compute(&answer, &keywords(&["alpha", "beta", "gamma"]));
        assert_eq!(score.value, 100);
        assert!(score.is_correct);
        assert_eq!(score.matched, 3);
    }

    #[test]
    fn keywordless_scores_depend_on_length() {
        let long = Score::compute(LONG_FILLER, &KeywordSet::new());
        assert_eq!(long.value, 70);
        assert!(long.is_correct);

        let short = Score::compute("short answer", &KeywordSet::new());
        assert_eq!(short.value, 30);
        assert!(!short.is_correct);
    }

    #[test]
    fn ratio_is_rounded() {
        // 2 of 3 keywords: 66.67 rounds to 67.
        let answer = format!("alpha beta. {LONG_FILLER}");
        let score = Score::compute(&answer, &keywords(&["alpha", "beta", "zeta"]));
        assert_eq!(score.value, 67);
        assert!(score.is_correct);
    }

    #[test]
    fn brief_answers_are_penalized() {
        let score = Score::compute("alpha beta gamma", &keywords(&["alpha", "beta", "gamma"]));
        assert_eq!(score.value, 70);
        assert!(score.is_correct);
        assert!(!score.length_adequate);

        let score = Score::compute("alpha", &keywords(&["alpha", "beta", "gamma", "delta"]));
        assert_eq!(score.value, 0);
        assert!(!score.is_correct);
    }

    #[test]
    fn below_pass_score_is_incorrect() {
        let answer = format!("alpha. {LONG_FILLER}");
        let score = Score::compute(&answer, &keywords(&["alpha", "beta"]));
        assert_eq!(score.value, 50);
        assert!(!score.is_correct);
    }

    #[test]
    fn length_is_measured_on_trimmed_answer() {
        let padded = format!("{}{}", " ".repeat(40), "x".repeat(20));
        assert!(!is_length_adequate(&padded));
        assert!(is_length_adequate(&"x".repeat(50)));
        assert!(!is_length_adequate(&"x".repeat(49)));
    }

    #[test]
    fn feedback_tiers() {
        assert_eq!(Feedback::select(100, false), Feedback::TooBrief);
        assert_eq!(Feedback::select(90, true), Feedback::Excellent);
        assert_eq!(Feedback::select(89, true), Feedback::Good);
        assert_eq!(Feedback::select(70, true), Feedback::Good);
        assert_eq!(Feedback::select(50, true), Feedback::Partial);
        assert_eq!(Feedback::select(49, true), Feedback::NeedsImprovement);
    }

    #[test]
    fn feedback_display_uses_message() {
        assert!(Feedback::TooBrief.to_string().contains("too brief"));
        assert!(Feedback::NoAnswer.to_string().starts_with("No answer provided"));
    }
}
