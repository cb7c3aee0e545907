pub mod telegram;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

use crate::error::Result;

/// One notification from the platform, decoded once at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// Platform-assigned, increasing identifier
    pub id: i64,
    pub kind: UpdateKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateKind {
    /// A user left the chat
    Departure { chat_id: i64, name: String },
    /// A new text message
    Text { chat_id: i64, text: String },
    /// An edit of an earlier message. Never treated as a fresh command.
    Edited { chat_id: i64 },
    Unrecognized,
}

/// Messaging platform as seen by the poll loop and the dispatcher.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Long-poll for updates with id >= `offset`, or anything queued when `None`.
    async fn fetch_updates(&self, offset: Option<i64>) -> Result<Vec<Update>>;

    /// Send a plain text message to a chat
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}
