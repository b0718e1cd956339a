//! Discord-backed chat session.

use crate::session::{ChannelHandle, ChatError, ChatSession};
use async_trait::async_trait;
use serenity::all::{ChannelId, Http};
use std::sync::Arc;
use tracing::debug;

impl From<serenity::Error> for ChatError {
    fn from(err: serenity::Error) -> Self {
        ChatError::Api(err.to_string())
    }
}

/// Chat session that talks to Discord over its REST API.
#[derive(Clone)]
pub struct DiscordSession {
    http: Arc<Http>,
}

impl DiscordSession {
    /// Wrap the HTTP client of a connected serenity client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl ChatSession for DiscordSession {
    async fn resolve_channel(&self, channel_id: u64) -> Option<ChannelHandle> {
        // Discord ids are non-zero; ChannelId::new panics on 0.
        if channel_id == 0 {
            return None;
        }

        match self.http.get_channel(ChannelId::new(channel_id)).await {
            Ok(channel) => {
                let handle = ChannelHandle::new(channel_id);
                Some(match channel.guild() {
                    Some(guild_channel) => handle.with_name(guild_channel.name),
                    None => handle,
                })
            }
            Err(e) => {
                debug!(channel_id = channel_id, error = %e, "Discord channel lookup failed");
                None
            }
        }
    }

    async fn send_message(&self, channel: &ChannelHandle, text: &str) -> Result<(), ChatError> {
        if channel.id == 0 {
            return Err(ChatError::UnknownChannel(channel.id));
        }
        ChannelId::new(channel.id).say(&self.http, text).await?;
        Ok(())
    }
}
