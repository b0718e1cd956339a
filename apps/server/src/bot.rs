//! Discord gateway event handling.

use crate::scheduler::Scheduler;
use async_trait::async_trait;
use deals_alerts::{ChatSession, DiscordSession};
use deals_feeds::DealFeed;
use serenity::all::{Context, EventHandler, Ready};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Everything needed to build the scheduler once the session is ready.
pub struct SchedulerSeed {
    pub feeds: Vec<Box<dyn DealFeed>>,
    pub channel_id: u64,
    pub interval: Duration,
}

/// Starts the scheduler on the first `ready` event.
///
/// Discord sends `ready` again after a gateway reconnect; the seed is taken
/// on the first one so only a single scheduler ever runs.
pub struct ReadyHandler {
    pending: Mutex<Option<SchedulerSeed>>,
}

impl ReadyHandler {
    pub fn new(seed: SchedulerSeed) -> Self {
        Self {
            pending: Mutex::new(Some(seed)),
        }
    }

    fn take_seed(&self) -> Option<SchedulerSeed> {
        match self.pending.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is online!", ready.user.name);

        let Some(seed) = self.take_seed() else {
            info!("Session ready again, scheduler already running");
            return;
        };

        let session: Arc<dyn ChatSession> = Arc::new(DiscordSession::new(ctx.http.clone()));
        let scheduler = Scheduler::new(session, seed.feeds, seed.channel_id, seed.interval);
        tokio::spawn(scheduler.run());
    }
}
