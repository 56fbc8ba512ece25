//! Position leg renderer

use crate::constants::render::{DEFAULT_STRIKE_METHOD, SPECIFIC_DATE_EXPIRY};
use crate::document::{ExpiryConfig, Position, PositionEntry, StrikeConfig};

/// Renders one position leg:
/// `BUY [ NFO, NIFTY, CALL, Current Week, ATM, MIS, 1 ]`.
/// Option legs carry expiry and strike fields; other instruments omit them.
pub fn render_position(position: &Position) -> String {
    let instrument = &position.instrument;
    let mut fields = vec![
        instrument.exchange.clone(),
        instrument.symbol_token.clone(),
        instrument.instrument_type.to_string(),
    ];
    if instrument.instrument_type.is_option() {
        fields.push(expiry_text(instrument.expiry_config.as_ref()));
        fields.push(strike_text(instrument.strike_config.as_ref()));
    }
    fields.push(position.product.clone());
    fields.push(position.quantity.value.to_string());
    format!("{} [ {} ]", position.side, fields.join(", "))
}

/// Renders an entry, or reports why it cannot be rendered.
pub fn render_position_entry(entry: &PositionEntry) -> Result<String, String> {
    match entry {
        PositionEntry::Leg(position) => Ok(render_position(position)),
        PositionEntry::Unrenderable { reason, .. } => Err(reason.clone()),
    }
}

/// Strike text rule: offset 0 shows the bare method, positive offsets get
/// an explicit `+`, negative offsets keep the sign of the number itself
/// (`ATM-2`). The sign is never normalized away.
pub fn strike_text(config: Option<&StrikeConfig>) -> String {
    let (method, offset) = match config {
        Some(c) => (c.selection_method.as_str(), c.offset),
        None => (DEFAULT_STRIKE_METHOD, 0),
    };
    if offset == 0 {
        method.to_string()
    } else if offset > 0 {
        format!("{method}+{offset}")
    } else {
        format!("{method}{offset}")
    }
}

/// Expiry text rule: an explicit date wins for `Specific Date` selectors,
/// otherwise the type tag, otherwise `-`.
fn expiry_text(config: Option<&ExpiryConfig>) -> String {
    let Some(config) = config else {
        return "-".to_string();
    };
    if config.kind.as_deref() == Some(SPECIFIC_DATE_EXPIRY) {
        if let Some(date) = &config.date {
            return date.clone();
        }
    }
    config.kind.clone().unwrap_or_else(|| "-".to_string())
}
