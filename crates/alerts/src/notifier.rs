//! Deal announcement formatting and delivery.

use crate::session::{ChannelHandle, ChatError, ChatSession};
use deals_core::{DealRecord, FeedSource};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Failed to send deal message: {0}")]
    Chat(#[from] ChatError),
}

/// Format a deal as a chat message using the template for its feed.
pub fn format_deal_message(source: FeedSource, deal: &DealRecord) -> String {
    match source {
        FeedSource::Epic => format!(
            "🎮 **FREE ON EPIC GAMES!**\n\
             **{}**\n\
             {}",
            deal.title, deal.url
        ),
        FeedSource::Steam => match deal.discount_percent {
            Some(discount) => format!(
                "🔥 **STEAM DISCOUNT!**\n\
                 **{}** - {}% OFF\n\
                 {}",
                deal.title, discount, deal.url
            ),
            None => format!(
                "🔥 **STEAM DISCOUNT!**\n\
                 **{}**\n\
                 {}",
                deal.title, deal.url
            ),
        },
    }
}

/// Sends one message per deal to a chat channel.
///
/// Send failures are returned to the caller untouched.
#[derive(Clone)]
pub struct Notifier {
    session: Arc<dyn ChatSession>,
}

impl Notifier {
    pub fn new(session: Arc<dyn ChatSession>) -> Self {
        Self { session }
    }

    /// Announce a single deal.
    pub async fn notify(
        &self,
        channel: &ChannelHandle,
        source: FeedSource,
        deal: &DealRecord,
    ) -> Result<(), NotifierError> {
        let message = format_deal_message(source, deal);
        self.session.send_message(channel, &message).await?;

        info!(
            channel = %channel,
            source = %source,
            title = %deal.title,
            "Deal announced"
        );
        Ok(())
    }
}
