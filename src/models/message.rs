use serde::{Deserialize, Serialize};

/// Maximum messages retained in a session before the oldest turns are dropped
const MAX_CONVERSATION_MESSAGES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Accumulated conversation for one studio session.
///
/// The full message list is re-sent on every follow-up call so the gateway
/// keeps conversational context. Growth is bounded: past
/// `MAX_CONVERSATION_MESSAGES` the oldest non-system messages are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.truncate_oldest();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Drop the oldest non-system messages until the log fits the cap
    fn truncate_oldest(&mut self) {
        while self.messages.len() > MAX_CONVERSATION_MESSAGES {
            let Some(pos) = self.messages.iter().position(|m| m.role != Role::System) else {
                // All-system log cannot shrink further
                return;
            };
            self.messages.remove(pos);
        }
    }
}
