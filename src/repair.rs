//! Repairing JSON parser
//!
//! Model output is rarely clean JSON: markdown fences, prose preambles and
//! trailing commas all show up in practice. Recovery runs in three stages,
//! strictest first, and the first stage to produce a value wins:
//!
//! 1. strict JSON
//! 2. relaxed JSON (json5: comments, trailing commas, unquoted keys)
//! 3. strict JSON over the first-`{`-to-last-`}` slice
//!
//! Nothing here validates against the schema; that is the judge's job
//! upstream. A text that defeats all three stages fails with the raw text
//! preserved for the caller.

use serde_json::Value;
use tracing::debug;

use crate::document::StrategyDocument;
use crate::error::ConvertError;

/// Runs the three-stage recovery chain over raw model text.
pub fn repair_json(raw: &str) -> Result<Value, ConvertError> {
    let strict_err = match serde_json::from_str::<Value>(raw) {
        Ok(v) => return Ok(v),
        Err(err) => err,
    };

    if let Ok(v) = json5::from_str::<Value>(raw) {
        debug!("🩹 [REPAIR] strict parse failed, relaxed parse accepted");
        return Ok(v);
    }

    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Ok(v) = serde_json::from_str::<Value>(&raw[start..=end]) {
                debug!(
                    "🩹 [REPAIR] extracted embedded object from bytes {}..={}",
                    start, end
                );
                return Ok(v);
            }
        }
    }

    Err(ConvertError::MalformedDocument {
        raw: raw.to_string(),
        source: strict_err,
    })
}

/// Repairs raw model text and converts it into the canonical model. The
/// repaired value is returned alongside so callers can echo the document
/// exactly as parsed.
pub fn parse_document(raw: &str) -> Result<(StrategyDocument, Value), ConvertError> {
    let value = repair_json(raw)?;
    let document = StrategyDocument::from_value(&value);
    Ok((document, value))
}
