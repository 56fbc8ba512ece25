//! Canonical strategy document model
//!
//! Model documents arrive as free-form JSON. This module converts a repaired
//! `serde_json::Value` into a closed set of typed shapes; everything the
//! dispatch does not recognize lands in an explicit `Opaque` or
//! `Unrenderable` variant instead of being duck-typed downstream. The
//! conversion itself never fails: garbage fragments are preserved and carried
//! to the render report.
//!
//! Two document generations are accepted: the phased shape
//! (`strategy_sets` / `phases` / `conditions`) and the legacy flat shape
//! (`sets` / `type` / `logic` + `rules`), which is adapted into single-phase
//! sets on entry.

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

use crate::constants::render;

// ============= Document =============

/// A whole strategy document: one or more sets, each with ordered phases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyDocument {
    pub sets: Vec<StrategySet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategySet {
    /// `set_index` as embedded in the document. Kept for reference only;
    /// display numbering follows document order.
    pub index: Option<i64>,
    /// Legacy flat-schema `type` tag (e.g. "intraday")
    pub label: Option<String>,
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    pub name: String,
    pub conditions: Option<ConditionNode>,
    pub positions: Vec<PositionEntry>,
}

impl StrategyDocument {
    /// Converts a repaired JSON value into the canonical model. Documents
    /// with neither a `strategy_sets` nor a `sets` array come back empty.
    pub fn from_value(root: &Value) -> StrategyDocument {
        let sets = if let Some(items) = root.get("strategy_sets").and_then(Value::as_array) {
            items.iter().map(StrategySet::from_phased).collect()
        } else if let Some(items) = root.get("sets").and_then(Value::as_array) {
            items.iter().map(StrategySet::from_flat).collect()
        } else {
            Vec::new()
        };
        StrategyDocument { sets }
    }
}

impl StrategySet {
    fn from_phased(v: &Value) -> StrategySet {
        let phases = v
            .get("phases")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(Phase::from_value).collect())
            .unwrap_or_default();
        StrategySet {
            index: v.get("set_index").and_then(Value::as_i64),
            label: None,
            phases,
        }
    }

    /// Legacy flat sets carry one implicit phase: the set's `type` tag
    /// becomes the phase name and the `logic`/`rules` groups become a
    /// condition tree.
    fn from_flat(v: &Value) -> StrategySet {
        let label = v
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string);
        let name = label
            .clone()
            .unwrap_or_else(|| render::DEFAULT_PHASE.to_string());
        StrategySet {
            index: v.get("set_index").and_then(Value::as_i64),
            label,
            phases: vec![Phase {
                name,
                conditions: flat_conditions(v.get("conditions")),
                positions: positions_from(v.get("positions")),
            }],
        }
    }
}

impl Phase {
    fn from_value(v: &Value) -> Phase {
        let name = v
            .get("phase_type")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or(render::DEFAULT_PHASE)
            .to_string();
        // Older documents name the field `entry_conditions`
        let conditions = v
            .get("conditions")
            .or_else(|| v.get("entry_conditions"))
            .filter(|c| !c.is_null())
            .map(ConditionNode::from_value);
        Phase {
            name,
            conditions,
            positions: positions_from(v.get("positions")),
        }
    }
}

fn positions_from(v: Option<&Value>) -> Vec<PositionEntry> {
    v.and_then(Value::as_array)
        .map(|items| items.iter().map(PositionEntry::from_value).collect())
        .unwrap_or_default()
}

// ============= Conditions =============

/// One node of a condition tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Group {
        logic: Connective,
        children: Vec<ConditionNode>,
    },
    Compare {
        left: Operand,
        operator: String,
        right: Operand,
    },
    /// Standalone operand sitting where a condition is expected (runtime
    /// variable stores, mostly)
    Leaf(Operand),
    /// Anything the dispatch does not recognize; renders as empty text
    Opaque(Value),
}

impl ConditionNode {
    pub fn from_value(v: &Value) -> ConditionNode {
        let Some(map) = v.as_object() else {
            return ConditionNode::Opaque(v.clone());
        };
        match map.get("condition_type").and_then(Value::as_str) {
            Some("GROUP") => ConditionNode::Group {
                logic: Connective::from_value(map.get("connection_logic")),
                children: map
                    .get("conditions")
                    .and_then(Value::as_array)
                    .map(|items| items.iter().map(ConditionNode::from_value).collect())
                    .unwrap_or_default(),
            },
            Some("COMPARE") => ConditionNode::Compare {
                left: operand_or_null(map.get("left")),
                operator: map
                    .get("operator")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                right: operand_or_null(map.get("right")),
            },
            _ if map.contains_key("keyword") => ConditionNode::Leaf(Operand::from_value(v)),
            _ => ConditionNode::Opaque(v.clone()),
        }
    }
}

fn operand_or_null(v: Option<&Value>) -> Operand {
    v.map(Operand::from_value)
        .unwrap_or(Operand::Scalar(Value::Null))
}

/// Logic operator joining the children of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connective {
    #[default]
    And,
    Or,
}

impl Connective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }

    /// Case-insensitive; anything that is not "or" is AND.
    pub fn from_value(v: Option<&Value>) -> Connective {
        match v.and_then(Value::as_str) {
            Some(s) if s.trim().eq_ignore_ascii_case("or") => Connective::Or,
            _ => Connective::And,
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============= Legacy flat conditions =============

fn flat_conditions(v: Option<&Value>) -> Option<ConditionNode> {
    let items = v?.as_array()?;
    let mut groups: Vec<ConditionNode> = items.iter().map(flat_group).collect();
    match groups.len() {
        0 => None,
        1 => Some(groups.remove(0)),
        _ => Some(ConditionNode::Group {
            logic: Connective::And,
            children: groups,
        }),
    }
}

fn flat_group(v: &Value) -> ConditionNode {
    ConditionNode::Group {
        logic: Connective::from_value(v.get("logic")),
        children: v
            .get("rules")
            .and_then(Value::as_array)
            .map(|rules| rules.iter().map(flat_rule).collect())
            .unwrap_or_default(),
    }
}

fn flat_rule(v: &Value) -> ConditionNode {
    match v.as_object() {
        Some(map) => ConditionNode::Compare {
            left: operand_or_null(map.get("left")),
            operator: map
                .get("operator")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            right: operand_or_null(map.get("right")),
        },
        None => ConditionNode::Opaque(v.clone()),
    }
}

// ============= Operands =============

/// The left or right side of a comparison, or a standalone keyword node.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Static numeric literal, e.g. `{"type": "number", "title": "0"}`
    Number {
        title: Option<Value>,
        value: Option<Value>,
    },
    /// Indicator / keyword / pattern call
    Call(CallOperand),
    /// Bare instrument reference without a name
    InstrumentRef { instrument: Instrument },
    /// Non-mapping scalar (string, number, bool, null)
    Scalar(Value),
    /// Mapping the dispatch does not recognize; coerced to raw text
    Opaque(Value),
}

/// JSON key under which a call operand carries its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKey {
    Function,
    Keyword,
    Pattern,
}

impl NameKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            NameKey::Function => "function_name",
            NameKey::Keyword => "keyword",
            NameKey::Pattern => "pattern_name",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallOperand {
    pub name: String,
    pub name_key: NameKey,
    pub timeframe: Option<String>,
    /// Raw `inputs` mapping; the embedded instrument is resolved on demand
    pub inputs: Option<Value>,
    /// Instrument attached at the top level of the operand
    pub instrument: Option<Instrument>,
    /// Raw `params` mapping (runtime variable name, nested value)
    pub params: Option<Value>,
    pub position_offset: Option<i64>,
}

impl Operand {
    pub fn from_value(v: &Value) -> Operand {
        let Some(map) = v.as_object() else {
            return Operand::Scalar(v.clone());
        };

        // Numeric literals win over everything else
        if map.get("type").and_then(Value::as_str) == Some("number") {
            return Operand::Number {
                title: map.get("title").filter(|t| !t.is_null()).cloned(),
                value: map.get("value").filter(|val| !val.is_null()).cloned(),
            };
        }

        let name_keys = [
            ("function_name", NameKey::Function),
            ("keyword", NameKey::Keyword),
            ("pattern_name", NameKey::Pattern),
        ];
        let named = name_keys
            .iter()
            .find_map(|(key, nk)| map.get(*key).and_then(Value::as_str).map(|s| (s, *nk)));
        if let Some((name, name_key)) = named {
            return Operand::Call(CallOperand {
                name: name.to_string(),
                name_key,
                timeframe: map
                    .get("timeframe")
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
                inputs: map.get("inputs").filter(|i| i.is_object()).cloned(),
                instrument: map.get("instrument").and_then(embedded_instrument),
                params: map.get("params").filter(|p| p.is_object()).cloned(),
                position_offset: map.get("position_offset").and_then(Value::as_i64),
            });
        }

        if let Some(raw) = map.get("instrument") {
            if let Some(instrument) = embedded_instrument(raw) {
                return Operand::InstrumentRef { instrument };
            }
        }

        Operand::Opaque(v.clone())
    }
}

impl CallOperand {
    /// Instrument association order: nested `inputs.instrument` first, then
    /// the top-level field.
    pub fn resolved_instrument(&self) -> Option<Instrument> {
        self.inputs
            .as_ref()
            .and_then(|inputs| inputs.get("instrument"))
            .and_then(embedded_instrument)
            .or_else(|| self.instrument.clone())
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.as_ref()?.get(key)
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.param(key)?.as_str()
    }
}

/// Instrument embedded in an operand. A non-mapping value still counts as
/// present and surfaces as an unknown symbol; a mapping with unusable field
/// types is dropped.
fn embedded_instrument(raw: &Value) -> Option<Instrument> {
    if raw.is_null() {
        return None;
    }
    match serde_json::from_value::<Instrument>(raw.clone()) {
        Ok(instrument) => Some(instrument),
        Err(_) if raw.is_object() => None,
        Err(_) => Some(Instrument {
            symbol_token: "Unknown".to_string(),
            ..Instrument::default()
        }),
    }
}

// ============= Positions =============

/// One element of a phase's position list. Values that fail typed
/// conversion are preserved with the reason instead of being dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEntry {
    Leg(Position),
    Unrenderable { raw: Value, reason: String },
}

impl PositionEntry {
    pub fn from_value(v: &Value) -> PositionEntry {
        match serde_json::from_value::<Position>(v.clone()) {
            Ok(position) => PositionEntry::Leg(position),
            Err(err) => PositionEntry::Unrenderable {
                raw: v.clone(),
                reason: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    #[serde(rename = "transaction_type", default)]
    pub side: TransactionSide,
    #[serde(rename = "product_type", default = "default_product")]
    pub product: String,
    #[serde(rename = "quantity_setup", default)]
    pub quantity: QuantityConfig,
    pub instrument: Instrument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_product() -> String {
    render::DEFAULT_PRODUCT.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSide {
    #[default]
    Buy,
    Sell,
}

impl TransactionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSide::Buy => "BUY",
            TransactionSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for TransactionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Instrument {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exchange: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub symbol_token: String,
    #[serde(default)]
    pub instrument_type: InstrumentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_config: Option<ExpiryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike_config: Option<StrikeConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InstrumentKind {
    Equity,
    #[default]
    Fut,
    Call,
    Put,
    Option,
    Other(String),
}

impl InstrumentKind {
    /// Option legs carry expiry and strike fields in the rendered text
    pub fn is_option(&self) -> bool {
        matches!(
            self,
            InstrumentKind::Call | InstrumentKind::Put | InstrumentKind::Option
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            InstrumentKind::Equity => "EQUITY",
            InstrumentKind::Fut => "FUT",
            InstrumentKind::Call => "CALL",
            InstrumentKind::Put => "PUT",
            InstrumentKind::Option => "OPTION",
            InstrumentKind::Other(s) => s,
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrikeConfig {
    #[serde(default = "default_strike_method")]
    pub selection_method: String,
    #[serde(default)]
    pub offset: i64,
}

impl Default for StrikeConfig {
    fn default() -> Self {
        StrikeConfig {
            selection_method: default_strike_method(),
            offset: 0,
        }
    }
}

fn default_strike_method() -> String {
    render::DEFAULT_STRIKE_METHOD.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default = "default_quantity")]
    pub value: Number,
}

impl Default for QuantityConfig {
    fn default() -> Self {
        QuantityConfig {
            kind: None,
            value: default_quantity(),
        }
    }
}

fn default_quantity() -> Number {
    Number::from(1u64)
}

// ============= Serde impls =============

// Operands serialize back to their source key names so the YAML dumps stay
// faithful to the document the model produced.

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Number { title, value } => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", "number")?;
                if let Some(title) = title {
                    map.serialize_entry("title", title)?;
                }
                if let Some(value) = value {
                    map.serialize_entry("value", value)?;
                }
                map.end()
            }
            Operand::Call(call) => call.serialize(serializer),
            Operand::InstrumentRef { instrument } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("instrument", instrument)?;
                map.end()
            }
            Operand::Scalar(v) | Operand::Opaque(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for CallOperand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.name_key.as_str(), &self.name)?;
        if let Some(timeframe) = &self.timeframe {
            map.serialize_entry("timeframe", timeframe)?;
        }
        if let Some(inputs) = &self.inputs {
            map.serialize_entry("inputs", inputs)?;
        }
        if let Some(instrument) = &self.instrument {
            map.serialize_entry("instrument", instrument)?;
        }
        if let Some(params) = &self.params {
            map.serialize_entry("params", params)?;
        }
        if let Some(offset) = &self.position_offset {
            map.serialize_entry("position_offset", offset)?;
        }
        map.end()
    }
}

impl Serialize for PositionEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PositionEntry::Leg(position) => position.serialize(serializer),
            PositionEntry::Unrenderable { raw, .. } => raw.serialize(serializer),
        }
    }
}

impl Serialize for TransactionSide {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionSide {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TransactionSide::Buy),
            "SELL" => Ok(TransactionSide::Sell),
            other => Err(serde::de::Error::custom(format!(
                "unrecognized transaction side `{other}`"
            ))),
        }
    }
}

impl Serialize for InstrumentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InstrumentKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let kind = match s.trim().to_ascii_uppercase().as_str() {
            "EQUITY" => InstrumentKind::Equity,
            "FUT" => InstrumentKind::Fut,
            "CALL" => InstrumentKind::Call,
            "PUT" => InstrumentKind::Put,
            "OPTION" => InstrumentKind::Option,
            _ => InstrumentKind::Other(s.trim().to_string()),
        };
        Ok(kind)
    }
}
