//! Operand formatter
//!
//! Turns operand shapes into the compact UI-style text the condition
//! renderer embeds: `LTP (NIFTY 50)`, `LOW (NIFTY 50, 15m)`,
//! `Set Runtime(EntryCandleLow = ...)`, `0`.

use serde_json::Value;

use crate::constants::render::{DEFAULT_VARIABLE, VALUE_KEYWORD};
use crate::constants::runtime_vars;
use crate::document::{CallOperand, Operand};

/// Formats a single operand. Never fails; unrecognized shapes degrade to
/// their raw JSON text.
pub fn format_operand(operand: &Operand) -> String {
    match operand {
        Operand::Number { title, value } => title
            .as_ref()
            .or(value.as_ref())
            .map(scalar_text)
            .unwrap_or_else(|| "0".to_string()),
        Operand::Scalar(v) => scalar_text(v),
        Operand::Call(call) => format_call(call),
        Operand::InstrumentRef { instrument } => format!(
            "{} ({})",
            instrument.keyword.as_deref().unwrap_or(VALUE_KEYWORD),
            instrument.symbol_token
        ),
        Operand::Opaque(v) => v.to_string(),
    }
}

fn format_call(call: &CallOperand) -> String {
    // Runtime variable stores/reads get their own cleaner shapes
    if call.name == runtime_vars::SET {
        let variable = call.param_str("variable_name").unwrap_or(DEFAULT_VARIABLE);
        let value = call
            .param("value")
            .filter(|v| !v.is_null())
            .map(|v| format_operand(&Operand::from_value(v)))
            .unwrap_or_default();
        return format!("{}({variable} = {value})", runtime_vars::SET);
    }
    if call.name == runtime_vars::GET || call.name == runtime_vars::GET_NUMBER {
        let variable = call.param_str("variable_name").unwrap_or_default();
        return format!("{} ({variable})", runtime_vars::GET);
    }

    match (call.resolved_instrument(), &call.timeframe) {
        (Some(instrument), Some(tf)) => {
            format!("{} ({}, {})", call.name, instrument.symbol_token, tf)
        }
        (Some(instrument), None) => format!("{} ({})", call.name, instrument.symbol_token),
        (None, Some(tf)) => format!("{} ({})", call.name, tf),
        (None, None) => call.name.clone(),
    }
}

/// Text form of a scalar JSON value: strings unquoted, everything else in
/// compact JSON form.
pub(crate) fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
