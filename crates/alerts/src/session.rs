//! Chat session abstraction.
//!
//! The notifier and scheduler only need to look a channel up by id and post
//! text to it; everything else about the chat platform stays behind this
//! trait.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat API error: {0}")]
    Api(String),
    #[error("Unknown channel: {0}")]
    UnknownChannel(u64),
}

/// A destination channel that was successfully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: u64,
    /// Channel name, when the platform reports one
    pub name: Option<String>,
}

impl ChannelHandle {
    pub fn new(id: u64) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for ChannelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "#{} ({})", name, self.id),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Capabilities the bot needs from a connected chat session.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Look a channel up by id. `None` when it does not exist or is not
    /// visible to the bot.
    async fn resolve_channel(&self, channel_id: u64) -> Option<ChannelHandle>;

    /// Post a text message to a resolved channel.
    async fn send_message(&self, channel: &ChannelHandle, text: &str) -> Result<(), ChatError>;
}
