//! Chat history model for the AI assistant.
//!
//! Conversations are kept locally, newest first, and replayed into the
//! UI on startup. Nothing here talks to the model itself; see
//! [`crate::generative`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: MessageSender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, MessageSender::User)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageSender::Assistant)
    }

    fn new(content: impl Into<String>, sender: MessageSender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// A stored conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

impl Chat {
    /// Creates an empty conversation with the placeholder title.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: "New Chat".to_string(),
            messages: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Derives a title from the first message: its first four words,
    /// truncated to 25 characters with a trailing ellipsis.
    pub fn derive_title(first_message: &str) -> String {
        let joined = first_message
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ");
        if joined.chars().count() > 25 {
            let truncated: String = joined.chars().take(25).collect();
            format!("{truncated}...")
        } else {
            joined
        }
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

/// Persistence for the chat list.
///
/// The whole list is written back after every mutation, mirroring the
/// cheap single-document store the drafts use.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Chat>>;

    async fn save_all(&self, chats: &[Chat]) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_takes_four_words() {
        assert_eq!(
            Chat::derive_title("how do I sort a vector in rust"),
            "how do I sort"
        );
    }

    #[test]
    fn test_derive_title_truncates_long_words() {
        let title = Chat::derive_title("pneumonoultramicroscopicsilicovolcanoconiosis explained");
        assert_eq!(title.chars().count(), 28);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn test_derive_title_short_message_untouched() {
        assert_eq!(Chat::derive_title("hi"), "hi");
    }

    #[test]
    fn test_new_chat_has_placeholder_title() {
        let chat = Chat::new();
        assert_eq!(chat.title, "New Chat");
        assert!(chat.messages.is_empty());
        assert!(!chat.id.is_empty());
    }

    #[test]
    fn test_message_constructors_tag_sender() {
        assert_eq!(ChatMessage::user("q").sender, MessageSender::User);
        assert_eq!(ChatMessage::assistant("a").sender, MessageSender::Assistant);
    }
}
