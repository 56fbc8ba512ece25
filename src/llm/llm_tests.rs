//! Unit tests for the chat-completion boundary.

#[cfg(test)]
mod llm_tests {
    use crate::llm::{ChatMessage, ChatRole, LlmClient};

    // ============= Client Construction Tests =============

    #[test]
    fn test_client_reports_configured_model() {
        let client = LlmClient::new(
            "test-key".to_string(),
            Some("http://localhost:11434/v1".to_string()),
            "test-model".to_string(),
            0.0,
        );
        assert_eq!(client.model(), "test-model");
    }

    // ============= Message Constructor Tests =============

    #[test]
    fn test_message_constructors() {
        let system = ChatMessage::system("follow the schema");
        assert_eq!(system.role, ChatRole::System);
        assert_eq!(system.content, "follow the schema");

        let user = ChatMessage::user("buy one lot of nifty");
        assert_eq!(user.role, ChatRole::User);
        assert_eq!(user.content, "buy one lot of nifty");
    }
}
