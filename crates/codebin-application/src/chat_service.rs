//! Conversation management for the AI assistant.

use std::sync::Arc;

use codebin_core::chat::{Chat, ChatMessage, ChatStore};
use codebin_core::error::{CodebinError, Result};
use codebin_core::generative::GenerativeBackend;
use tokio::sync::Mutex;

/// Use case for the persisted chat list and message exchange.
///
/// The whole list is kept in memory, newest chat first, and written
/// back after every mutation. Persistence is best-effort: a failed
/// write is logged, not surfaced, so a flaky disk never loses an
/// in-memory conversation mid-session.
pub struct ChatService {
    backend: Arc<dyn GenerativeBackend>,
    store: Arc<dyn ChatStore>,
    chats: Mutex<Vec<Chat>>,
}

impl ChatService {
    /// Creates the service, replaying stored history. A corrupt or
    /// unreadable history file degrades to an empty list.
    pub async fn new(backend: Arc<dyn GenerativeBackend>, store: Arc<dyn ChatStore>) -> Self {
        let chats = match store.load_all().await {
            Ok(chats) => chats,
            Err(e) => {
                tracing::warn!("[Chat] Failed to load history: {}", e);
                Vec::new()
            }
        };
        Self {
            backend,
            store,
            chats: Mutex::new(chats),
        }
    }

    /// All conversations, newest first.
    pub async fn list(&self) -> Vec<Chat> {
        self.chats.lock().await.clone()
    }

    /// Starts a new empty conversation.
    pub async fn create(&self) -> Chat {
        let chat = Chat::new();
        let mut chats = self.chats.lock().await;
        chats.insert(0, chat.clone());
        self.persist(&chats).await;
        chat
    }

    /// Deletes a conversation by id.
    pub async fn delete(&self, chat_id: &str) -> Result<()> {
        let mut chats = self.chats.lock().await;
        let before = chats.len();
        chats.retain(|c| c.id != chat_id);
        if chats.len() == before {
            return Err(CodebinError::not_found("chat", chat_id));
        }
        self.persist(&chats).await;
        Ok(())
    }

    /// Sends a user message and returns the assistant's reply.
    ///
    /// The user message is appended (and the title derived, if this is
    /// the conversation's first message) before the model is called, so
    /// a generative failure surfaces the error but keeps what the user
    /// typed.
    pub async fn send(&self, chat_id: &str, text: &str) -> Result<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CodebinError::validation("message must not be empty"));
        }

        {
            let mut chats = self.chats.lock().await;
            let chat = find_chat(&mut chats, chat_id)?;
            chat.messages.push(ChatMessage::user(text));
            if chat.messages.len() == 1 {
                chat.title = Chat::derive_title(text);
            }
            self.persist(&chats).await;
        }

        let reply = self.backend.generate(text).await?;

        let message = ChatMessage::assistant(reply);
        let mut chats = self.chats.lock().await;
        let chat = find_chat(&mut chats, chat_id)?;
        chat.messages.push(message.clone());
        self.persist(&chats).await;
        Ok(message)
    }

    async fn persist(&self, chats: &[Chat]) {
        if let Err(e) = self.store.save_all(chats).await {
            tracing::warn!("[Chat] Failed to persist history: {}", e);
        }
    }
}

fn find_chat<'a>(chats: &'a mut [Chat], chat_id: &str) -> Result<&'a mut Chat> {
    chats
        .iter_mut()
        .find(|c| c.id == chat_id)
        .ok_or_else(|| CodebinError::not_found("chat", chat_id))
}
