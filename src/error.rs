//! Custom error types for the conversion pipeline
//!
//! Provides structured, typed errors instead of generic Box<dyn Error>.
//! Every failure that carries model output keeps the raw text around so the
//! API layer (and the logs) can hand the artifact back to the caller instead
//! of discarding it.

use std::fmt;

use thiserror::Error;

/// Which of the two service calls inside an attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStage {
    Generate,
    Validate,
}

impl fmt::Display for CallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallStage::Generate => write!(f, "generate"),
            CallStage::Validate => write!(f, "validate"),
        }
    }
}

/// Top-level conversion errors
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The text-generation service could not be reached or rejected a call.
    /// Transport problems abort the conversion immediately and are never
    /// retried against the validation budget.
    #[error("{stage} call to the text-generation service failed: {message}")]
    Transport {
        stage: CallStage,
        message: String,
        /// Last candidate document produced before the failure, if any
        last_candidate: Option<String>,
    },

    /// Model output survived the judge but no stage of the repairing parser
    /// could turn it into JSON
    #[error("model output could not be repaired into a JSON document")]
    MalformedDocument {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// The judge rejected every candidate within the retry budget
    #[error("no schema-conforming document after {attempts} attempts")]
    ValidationExhausted { attempts: u32, last_candidate: String },

    /// The caller cancelled the conversion between attempts
    #[error("conversion cancelled by caller")]
    Cancelled,
}

impl ConvertError {
    /// Raw model text associated with the failure, when one exists
    pub fn raw_artifact(&self) -> Option<&str> {
        match self {
            ConvertError::Transport { last_candidate, .. } => last_candidate.as_deref(),
            ConvertError::MalformedDocument { raw, .. } => Some(raw),
            ConvertError::ValidationExhausted { last_candidate, .. } => Some(last_candidate),
            ConvertError::Cancelled => None,
        }
    }
}

/// Chat-completion boundary errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("chat completion request failed: {0}")]
    Request(String),

    #[error("chat completion returned no choices")]
    EmptyResponse,
}

/// Startup errors while loading configuration or the schema file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path} as YAML")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse {path} as JSON")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
