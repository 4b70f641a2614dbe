//! JSON-backed persistence for assistant conversations.

use std::path::PathBuf;

use async_trait::async_trait;
use codebin_core::chat::{Chat, ChatStore};
use codebin_core::error::Result;

use crate::storage::JsonStore;

/// Persists the whole conversation list in one document, newest first.
pub struct JsonChatRepository {
    store: JsonStore,
}

impl JsonChatRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            store: JsonStore::new(path),
        }
    }
}

#[async_trait]
impl ChatStore for JsonChatRepository {
    async fn load_all(&self) -> Result<Vec<Chat>> {
        let chats: Option<Vec<Chat>> = self.store.load()?;
        Ok(chats.unwrap_or_default())
    }

    async fn save_all(&self, chats: &[Chat]) -> Result<()> {
        self.store.save(&chats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codebin_core::chat::ChatMessage;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_store_loads_empty_list() {
        let dir = TempDir::new().unwrap();
        let repo = JsonChatRepository::new(dir.path().join("chats.json"));
        assert!(repo.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_messages() {
        let dir = TempDir::new().unwrap();
        let repo = JsonChatRepository::new(dir.path().join("chats.json"));

        let mut chat = Chat::new();
        chat.messages.push(ChatMessage::user("hello"));
        chat.messages.push(ChatMessage::assistant("hi there"));
        repo.save_all(&[chat.clone()]).await.unwrap();

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, chat.id);
        assert_eq!(loaded[0].messages.len(), 2);
        assert_eq!(loaded[0].messages[0].content, "hello");
        assert_eq!(loaded[0].messages[1].content, "hi there");
    }

    #[tokio::test]
    async fn test_save_replaces_previous_contents() {
        let dir = TempDir::new().unwrap();
        let repo = JsonChatRepository::new(dir.path().join("chats.json"));

        repo.save_all(&[Chat::new(), Chat::new()]).await.unwrap();
        let survivor = Chat::new();
        repo.save_all(&[survivor.clone()]).await.unwrap();

        let loaded = repo.load_all().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, survivor.id);
    }
}
