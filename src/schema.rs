//! Generation schema handling
//!
//! The schema is deliberately opaque: a JSON value embedded verbatim into
//! prompts and served over the API, never structurally interpreted here.
//! Conformance judgment belongs to the judge agent; swapping the schema
//! file changes the generated documents without touching code.

use std::fs;

use serde_json::Value;

use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct Schema {
    value: Value,
}

impl Schema {
    pub fn load(path: &str) -> Result<Schema, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        // Handle BOM if present
        let cleaned = contents.strip_prefix('\u{feff}').unwrap_or(&contents);
        let value = serde_json::from_str(cleaned).map_err(|source| ConfigError::Json {
            path: path.to_string(),
            source,
        })?;
        Ok(Schema { value })
    }

    pub fn from_value(value: Value) -> Schema {
        Schema { value }
    }

    /// Pretty-printed text embedded verbatim into prompts
    pub fn prompt_text(&self) -> String {
        serde_json::to_string_pretty(&self.value).unwrap_or_else(|_| self.value.to_string())
    }

    pub fn as_value(&self) -> &Value {
        &self.value
    }
}
