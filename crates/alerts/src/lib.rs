//! Chat delivery for storefront deals.
//!
//! This crate provides:
//! - The `ChatSession` seam over the chat platform
//! - A Discord implementation of it
//! - Per-feed message templates and the `Notifier`

pub mod discord;
pub mod notifier;
pub mod session;

pub use discord::DiscordSession;
pub use notifier::{format_deal_message, Notifier, NotifierError};
pub use session::{ChannelHandle, ChatError, ChatSession};
