//! Polling cycle: resolve channel, poll each feed in turn, announce new deals.

use deals_alerts::{ChatSession, Notifier, NotifierError};
use deals_core::FeedSource;
use deals_feeds::{DealFeed, FetchOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    RunningCycle,
}

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// Destination channel could not be resolved; no feed was polled.
    ChannelUnavailable,
    Completed {
        /// Messages sent across all feeds
        sent: usize,
        /// Feeds whose fetch failed this cycle
        failed_feeds: Vec<FeedSource>,
    },
}

/// Runs polling cycles on a fixed interval.
///
/// The scheduler owns its feeds (and so their seen-sets) exclusively, and a
/// cycle always finishes before the next tick is awaited.
pub struct Scheduler {
    session: Arc<dyn ChatSession>,
    notifier: Notifier,
    feeds: Vec<Box<dyn DealFeed>>,
    channel_id: u64,
    interval: Duration,
    state: SchedulerState,
}

impl Scheduler {
    /// `feeds` are polled in the given order every cycle.
    pub fn new(
        session: Arc<dyn ChatSession>,
        feeds: Vec<Box<dyn DealFeed>>,
        channel_id: u64,
        interval: Duration,
    ) -> Self {
        Self {
            notifier: Notifier::new(session.clone()),
            session,
            feeds,
            channel_id,
            interval,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Run one cycle. A send failure aborts the rest of the cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, NotifierError> {
        self.state = SchedulerState::RunningCycle;
        let result = self.cycle().await;
        self.state = SchedulerState::Idle;
        result
    }

    async fn cycle(&mut self) -> Result<CycleReport, NotifierError> {
        let Some(channel) = self.session.resolve_channel(self.channel_id).await else {
            warn!(
                channel_id = self.channel_id,
                "Channel not found, skipping cycle. Check the configured channel id."
            );
            return Ok(CycleReport::ChannelUnavailable);
        };
        debug!(channel = %channel, "Posting to channel");

        let mut sent = 0;
        let mut failed_feeds = Vec::new();

        for feed in self.feeds.iter_mut() {
            let source = feed.source();
            match feed.fetch().await {
                FetchOutcome::Fetched(deals) => {
                    debug!(source = %source, new_deals = deals.len(), "Feed polled");
                    for deal in &deals {
                        self.notifier.notify(&channel, source, deal).await?;
                        sent += 1;
                    }
                }
                FetchOutcome::Failed(e) => {
                    warn!(
                        source = %source,
                        error = %e,
                        transient = e.is_transient(),
                        "Feed fetch failed, no deals this cycle"
                    );
                    failed_feeds.push(source);
                }
            }
        }

        Ok(CycleReport::Completed { sent, failed_feeds })
    }

    /// Run a cycle now, then one every interval, forever.
    pub async fn run(mut self) {
        info!(
            channel_id = self.channel_id,
            interval_secs = self.interval.as_secs(),
            feeds = self.feeds.len(),
            "Starting deal scheduler"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.run_cycle().await {
                Ok(CycleReport::Completed { sent, failed_feeds }) => {
                    info!(
                        sent = sent,
                        failed_feeds = failed_feeds.len(),
                        "Cycle complete"
                    );
                }
                Ok(CycleReport::ChannelUnavailable) => {}
                Err(e) => {
                    error!(error = %e, "Cycle aborted");
                }
            }

            if let Ok(interval) = chrono::Duration::from_std(self.interval) {
                let next = chrono::Utc::now() + interval;
                debug!("Next cycle at {}", next.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
    }
}
