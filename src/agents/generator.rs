use crate::llm::ChatMessage;
use crate::schema::Schema;

/// Builds the message sequences that ask the model for a strategy document.
/// The schema text is embedded verbatim; the agent never talks to the
/// service itself.
#[derive(Clone)]
pub struct GeneratorAgent {
    schema_text: String,
}

impl GeneratorAgent {
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema_text: schema.prompt_text(),
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "ONLY output valid JSON. No comments. No text. No explanations.\n\
             It MUST strictly match this schema:\n{}",
            self.schema_text
        )
    }

    /// First ask: the caller's instruction verbatim under the JSON-only
    /// system prompt.
    pub fn initial_messages(&self, instruction: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(instruction),
        ]
    }

    /// Corrective ask after a rejected candidate: same system prompt, user
    /// message restates the schema and the original instruction.
    pub fn corrective_messages(&self, instruction: &str) -> Vec<ChatMessage> {
        let prompt = format!(
            "The JSON you generated was INVALID.\n\
             Regenerate a NEW JSON that matches the schema exactly.\n\
             Output ONLY JSON.\n\n\
             Schema:\n{}\n\n\
             Original request:\n{}",
            self.schema_text, instruction
        );
        vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(prompt),
        ]
    }
}
