//! lectern-providers — LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI, Anthropic, and Ollama, and
//! loads the `lectern.toml` configuration that selects between them.

pub mod anthropic;
pub mod config;
pub mod error;
mod http;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{
    build_question_source, create_provider, load_config, load_config_from, LecternConfig,
    ProviderConfig, ServerConfig,
};
pub use error::ProviderError;
