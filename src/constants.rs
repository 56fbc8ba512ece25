//! Application-wide constants and magic values
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and keep the renderers, the retry loop, and the prompts in one tune-able
//! place.

/// Runtime-variable operand names recognized by the operand formatter
pub mod runtime_vars {
    /// Stores a value into a named runtime variable
    pub const SET: &str = "Set Runtime";

    /// Reads a named runtime variable
    pub const GET: &str = "Get Runtime";

    /// Reads a named runtime variable as a number
    pub const GET_NUMBER: &str = "Get Runtime Number";
}

/// Text renderer formatting constants
pub mod render {
    /// One indentation level inside a condition tree
    pub const INDENT_STEP: &str = "    ";

    /// Width of the dashed rule under each `Set #n` header
    pub const SET_SEPARATOR_WIDTH: usize = 35;

    /// Placeholder printed when a phase carries no conditions
    pub const NONE_MARKER: &str = "(None)";

    /// Product type used when a position does not name one
    pub const DEFAULT_PRODUCT: &str = "MIS";

    /// Strike selection method used when a strike config is absent
    pub const DEFAULT_STRIKE_METHOD: &str = "ATM";

    /// Expiry type whose explicit date takes precedence over the type tag
    pub const SPECIFIC_DATE_EXPIRY: &str = "Specific Date";

    /// Fallback label for an instrument reference without a keyword
    pub const VALUE_KEYWORD: &str = "Value";

    /// Phase name used when a phase does not carry one
    pub const DEFAULT_PHASE: &str = "Entry";

    /// Variable name shown when a runtime store omits one
    pub const DEFAULT_VARIABLE: &str = "Var";
}

/// Generation-validation loop constants
pub mod retry {
    /// Attempts (generate + validate pairs) before giving up
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
}

/// Judge verdict tokens
pub mod verdict {
    pub const VALID: &str = "VALID";
    pub const INVALID: &str = "INVALID";
}

/// LLM defaults
pub mod llm {
    /// Model used when the config does not name one
    pub const DEFAULT_MODEL: &str = "openai/gpt-oss-20b";

    /// Near-deterministic sampling; the generator must follow the schema,
    /// not improvise
    pub const DEFAULT_TEMPERATURE: f32 = 0.0;
}
