use crate::constants::verdict;
use crate::llm::ChatMessage;
use crate::schema::Schema;

/// Schema-conformance verdict. Anything that is not exactly the VALID token
/// (after trimming, case-insensitive) is a rejection; there is no partial
/// credit and no "mostly valid".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid,
}

impl Verdict {
    pub fn parse(response: &str) -> Verdict {
        if response.trim().eq_ignore_ascii_case(verdict::VALID) {
            Verdict::Valid
        } else {
            Verdict::Invalid
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

/// Builds the conformance check for a candidate document: one user message
/// embedding both the schema and the candidate, demanding a one-word
/// verdict. The judge carries no system prompt.
#[derive(Clone)]
pub struct JudgeAgent {
    schema_text: String,
}

impl JudgeAgent {
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema_text: schema.prompt_text(),
        }
    }

    pub fn messages(&self, candidate: &str) -> Vec<ChatMessage> {
        let prompt = format!(
            "You must validate the JSON against the schema.\n\n\
             Schema:\n{}\n\n\
             JSON:\n{}\n\n\
             Respond ONLY with:\n{}\nor\n{}",
            self.schema_text,
            candidate,
            verdict::VALID,
            verdict::INVALID
        );
        vec![ChatMessage::user(prompt)]
    }
}
