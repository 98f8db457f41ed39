use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
}

impl ConversationMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only chat history of one session. The leading system message is
/// written once and never shown.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
}

impl Conversation {
    pub fn ensure_system(&mut self, prompt: impl FnOnce() -> String) {
        if self.messages.is_empty() {
            self.messages.push(ConversationMessage::system(prompt()));
        }
    }

    /// The full history plus a pending user message, ready to send.
    pub fn with_pending(&self, user: &str) -> Vec<ConversationMessage> {
        let mut messages = self.messages.clone();
        messages.push(ConversationMessage::user(user));
        messages
    }

    pub fn record_exchange(&mut self, user: String, assistant: String) {
        self.messages.push(ConversationMessage::user(user));
        self.messages.push(ConversationMessage::assistant(assistant));
    }

    pub fn visible(&self) -> Vec<ConversationMessage> {
        self.messages
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_message_is_synthesized_once_and_hidden() {
        let mut conversation = Conversation::default();
        conversation.ensure_system(|| "first".to_string());
        conversation.ensure_system(|| "second".to_string());
        conversation.record_exchange("hi".to_string(), "hello".to_string());

        assert_eq!(conversation.len(), 3);
        let visible = conversation.visible();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[0], ConversationMessage::user("hi"));
        assert_eq!(visible[1], ConversationMessage::assistant("hello"));

        let pending = conversation.with_pending("next");
        assert_eq!(pending[0], ConversationMessage::system("first"));
        assert_eq!(pending.last().unwrap().content, "next");
        assert_eq!(conversation.len(), 3);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ConversationMessage::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
