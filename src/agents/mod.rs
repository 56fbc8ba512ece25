//! Prompt-owning roles of the conversion pipeline
//!
//! Each agent owns the exact prompt text for one responsibility: the
//! generator asks for documents, the judge passes verdicts on them. The
//! pipeline decides when to send which; neither agent talks to the service
//! itself, which keeps both trivially testable.

pub mod generator;
pub mod judge;

pub use generator::GeneratorAgent;
pub use judge::{JudgeAgent, Verdict};
