//! lectern-core — Answer analysis engine, question bank, and generation traits.
//!
//! This crate defines the data model, the rule-based answer grader, the
//! static fallback question bank, and the LLM-backed quiz pipeline that the
//! rest of lectern builds on.

pub mod engine;
pub mod error;
pub mod keywords;
pub mod model;
pub mod pipeline;
pub mod questions;
pub mod scoring;
pub mod traits;

pub use engine::{analyze_answer, analyze_batch};
pub use error::{AnalysisError, GenerationError, ProviderError};
pub use model::{AnalysisResult, AnswerQuery, BatchResult, Topic};
