//! Topic detection and expected-keyword resolution.
//!
//! The expected keywords for an answer come from a fixed, ordered table of
//! topics. Each topic has triggers (substrings looked for in some of the
//! question / lecture / course fields) and an ordered list of keyword rules
//! matched against the question. The first triggered topic wins, and inside
//! it the first matching rule wins.
//!
//! A triggered topic with no matching rule resolves to an *empty* keyword
//! set. It does not fall through to the generic extractor; the scorer then
//! grades on length alone.

use serde::Serialize;

use crate::model::Topic;

/// Question words that never count as significant terms.
pub const STOPWORDS: &[&str] = &[
    "what", "explain", "describe", "discuss", "how", "when", "where", "which", "this", "that",
    "these", "those",
];

/// Tokens must be longer than this (in characters) to be significant.
const MIN_TERM_CHARS: usize = 3;

// ---------------------------------------------------------------------------
// Keyword sets
// ---------------------------------------------------------------------------

/// An ordered, deduplicated set of lowercase terms expected in a good answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordSet {
    terms: Vec<String>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from static terms, lowercasing and dropping duplicates.
    pub fn from_terms(terms: &[&str]) -> Self {
        let mut set = Self::new();
        for term in terms {
            set.insert(term);
        }
        set
    }

    /// Insert a term; returns `false` if it was already present.
    pub fn insert(&mut self, term: &str) -> bool {
        let term = term.to_lowercase();
        if self.terms.contains(&term) {
            return false;
        }
        self.terms.push(term);
        true
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Count the terms that occur anywhere in `text`, case-insensitively.
    /// Each term counts at most once.
    pub fn count_matches(&self, text: &str) -> usize {
        let text = text.to_lowercase();
        self.terms
            .iter()
            .filter(|term| text.contains(term.as_str()))
            .count()
    }
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

/// Which request fields a trigger looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields {
    pub question: bool,
    pub lecture: bool,
    pub course: bool,
}

impl Fields {
    pub const QUESTION: Fields = Fields {
        question: true,
        lecture: false,
        course: false,
    };
    pub const LECTURE: Fields = Fields {
        question: false,
        lecture: true,
        course: false,
    };
    pub const COURSE: Fields = Fields {
        question: false,
        lecture: false,
        course: true,
    };
    pub const QUESTION_OR_LECTURE: Fields = Fields {
        question: true,
        lecture: true,
        course: false,
    };
    pub const LECTURE_OR_COURSE: Fields = Fields {
        question: false,
        lecture: true,
        course: true,
    };
    pub const ANY: Fields = Fields {
        question: true,
        lecture: true,
        course: true,
    };
}

/// A substring that selects a topic when found in any of `fields`.
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub term: &'static str,
    pub fields: Fields,
}

impl Trigger {
    pub const fn new(term: &'static str, fields: Fields) -> Self {
        Self { term, fields }
    }

    /// Check the trigger against already-lowercased fields.
    pub fn fires(&self, text: &LoweredText) -> bool {
        (self.fields.question && text.question.contains(self.term))
            || (self.fields.lecture && text.lecture.contains(self.term))
            || (self.fields.course && text.course.contains(self.term))
    }
}

/// How a keyword rule matches the question.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// At least one of the substrings occurs.
    Any(&'static [&'static str]),
    /// Every substring occurs.
    All(&'static [&'static str]),
}

impl Pattern {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Pattern::Any(terms) => terms.iter().any(|t| text.contains(t)),
            Pattern::All(terms) => terms.iter().all(|t| text.contains(t)),
        }
    }
}

/// A question sub-pattern and the keywords it expects in the answer.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub pattern: Pattern,
    pub keywords: &'static [&'static str],
}

const fn rule(pattern: Pattern, keywords: &'static [&'static str]) -> KeywordRule {
    KeywordRule { pattern, keywords }
}

/// One row of the topic table.
#[derive(Debug, Clone, Copy)]
pub struct TopicRules {
    pub topic: Topic,
    pub triggers: &'static [Trigger],
    pub rules: &'static [KeywordRule],
}

/// Topics in priority order. `Topic::General` has no row; it is what you get
/// when nothing here fires.
pub static TOPIC_TABLE: &[TopicRules] = &[
    TopicRules {
        topic: Topic::Python,
        triggers: &[Trigger::new("python", Fields::QUESTION_OR_LECTURE)],
        rules: &[
            rule(
                Pattern::Any(&["feature", "popular"]),
                &["readability", "easy", "simple", "libraries", "versatile", "interpreted"],
            ),
            rule(
                Pattern::Any(&["variable"]),
                &["dynamic", "typing", "declaration", "assignment", "type"],
            ),
            rule(
                Pattern::All(&["list", "tuple"]),
                &["mutable", "immutable", "parentheses", "brackets", "modify"],
            ),
            rule(
                Pattern::Any(&["module", "package"]),
                &["import", "organization", "reuse", "namespace", "library"],
            ),
            rule(
                Pattern::Any(&["exception"]),
                &["try", "except", "catch", "handle", "error", "finally"],
            ),
        ],
    },
    TopicRules {
        topic: Topic::MachineLearning,
        triggers: &[Trigger::new("machine learning", Fields::ANY)],
        rules: &[
            rule(
                Pattern::Any(&["differ", "traditional"]),
                &["data", "patterns", "algorithm", "explicit", "programming", "learn"],
            ),
            rule(
                Pattern::All(&["supervised", "unsupervised"]),
                &["labeled", "unlabeled", "target", "classification", "clustering"],
            ),
            rule(
                Pattern::All(&["training", "test"]),
                &["generalization", "validation", "overfitting", "performance", "evaluate"],
            ),
            rule(
                Pattern::Any(&["overfitting"]),
                &["regularization", "validation", "generalize", "complex", "flexible"],
            ),
            rule(
                Pattern::Any(&["evaluation", "metric"]),
                &["accuracy", "precision", "recall", "f1", "auc", "roc"],
            ),
        ],
    },
    TopicRules {
        topic: Topic::NeuralNetworks,
        triggers: &[
            Trigger::new("neural", Fields::QUESTION),
            Trigger::new("deep learning", Fields::LECTURE_OR_COURSE),
        ],
        rules: &[
            rule(
                Pattern::Any(&["structure"]),
                &["input", "hidden", "output", "layer", "weight", "bias", "neuron"],
            ),
            rule(
                Pattern::Any(&["activation"]),
                &["relu", "sigmoid", "tanh", "non-linear", "function"],
            ),
            rule(
                Pattern::Any(&["cnn", "convolutional"]),
                &["filter", "kernel", "convolution", "pooling", "feature", "image"],
            ),
            rule(
                Pattern::Any(&["backpropagation"]),
                &["gradient", "descent", "error", "weight", "update", "learning"],
            ),
            rule(
                Pattern::Any(&["transfer"]),
                &["pretrained", "model", "feature", "extraction", "fine-tuning"],
            ),
        ],
    },
    TopicRules {
        topic: Topic::DataAnalytics,
        triggers: &[
            Trigger::new("data", Fields::QUESTION),
            Trigger::new("analytics", Fields::LECTURE_OR_COURSE),
        ],
        rules: &[
            rule(
                Pattern::Any(&["workflow", "steps"]),
                &[
                    "collection",
                    "cleaning",
                    "exploration",
                    "analysis",
                    "visualization",
                    "interpretation",
                ],
            ),
            rule(
                Pattern::All(&["descriptive", "inferential"]),
                &["summarize", "population", "sample", "hypothesis", "testing", "inference"],
            ),
            rule(
                Pattern::Any(&["missing"]),
                &["imputation", "deletion", "mean", "median", "mode", "regression"],
            ),
            rule(
                Pattern::All(&["feature", "engineering"]),
                &["transformation", "selection", "creation", "normalization", "scaling"],
            ),
            rule(
                Pattern::Any(&["visualization"]),
                &["chart", "graph", "plot", "dashboard", "histogram", "scatter"],
            ),
        ],
    },
];

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Lowercased copies of the fields the table is matched against.
#[derive(Debug, Clone)]
pub struct LoweredText {
    pub question: String,
    pub lecture: String,
    pub course: String,
}

impl LoweredText {
    pub fn new(question: &str, lecture_title: &str, course_name: &str) -> Self {
        Self {
            question: question.to_lowercase(),
            lecture: lecture_title.to_lowercase(),
            course: course_name.to_lowercase(),
        }
    }
}

/// Find the first table row whose triggers fire.
fn matching_row(text: &LoweredText) -> Option<&'static TopicRules> {
    TOPIC_TABLE
        .iter()
        .find(|row| row.triggers.iter().any(|t| t.fires(text)))
}

/// Detect which topic an answer is graded under.
pub fn detect_topic(question: &str, lecture_title: &str, course_name: &str) -> Topic {
    let text = LoweredText::new(question, lecture_title, course_name);
    matching_row(&text).map_or(Topic::General, |row| row.topic)
}

/// Resolve the expected keywords for a question.
pub fn resolve(question: &str, lecture_title: &str, course_name: &str) -> KeywordSet {
    resolve_with_topic(question, lecture_title, course_name).1
}

/// Resolve the expected keywords together with the topic that produced them.
pub fn resolve_with_topic(
    question: &str,
    lecture_title: &str,
    course_name: &str,
) -> (Topic, KeywordSet) {
    let text = LoweredText::new(question, lecture_title, course_name);

    match matching_row(&text) {
        Some(row) => {
            let keywords = row
                .rules
                .iter()
                .find(|r| r.pattern.matches(&text.question))
                .map(|r| KeywordSet::from_terms(r.keywords))
                .unwrap_or_default();
            (row.topic, keywords)
        }
        None => (
            Topic::General,
            significant_terms(&[&text.lecture, &text.question]),
        ),
    }
}

/// Collect whitespace-separated tokens longer than three characters that are
/// not stopwords. Punctuation attached to a token is kept.
pub fn significant_terms(sources: &[&str]) -> KeywordSet {
    let mut set = KeywordSet::new();
    for source in sources {
        for token in source.split_whitespace() {
            let token = token.to_lowercase();
            if token.chars().count() > MIN_TERM_CHARS && !STOPWORDS.contains(&token.as_str()) {
                set.insert(&token);
            }
        }
    }
    set
}
