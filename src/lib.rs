//! Strategen - natural-language trading instructions to strategy documents
//!
//! This library provides the core functionality for turning free-form
//! trading instructions into schema-conforming JSON strategy documents:
//! LLM generation with judge-validated retries, a repairing JSON parser for
//! messy model output, and renderers that turn documents into readable
//! strategy cards and YAML fragments.

pub mod agents;
pub mod api;
pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod render;
pub mod repair;
pub mod schema;

// Re-export commonly used types
pub use config::AppConfig;
pub use document::StrategyDocument;
pub use error::ConvertError;
pub use pipeline::{CancelToken, Conversion, ConversionPipeline, RetryPolicy};
pub use schema::Schema;

#[cfg(test)]
mod repair_tests;
