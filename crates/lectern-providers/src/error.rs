//! Provider error types.
//!
//! The error enum itself lives in `lectern-core` so the quiz pipeline can
//! downcast it for retry decisions. Status classification is in
//! [`crate::http`].

pub use lectern_core::error::ProviderError;
