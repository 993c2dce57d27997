//! Decision Poller
//!
//! Refreshes the active freelancer's decisions on a fixed interval and
//! publishes each result as a [`DecisionFeed`] snapshot that replaces the
//! previous one wholesale.
//!
//! The poller is owned by its caller: [`DecisionPoller::stop`] (or dropping
//! the poller) cancels the timer. A refresh still in flight at that moment
//! finishes, but its result is thrown away.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use platform::task::PeriodicTask;
use serde::Serialize;
use tokio::sync::watch;

use crate::application::decision_sync::{DecisionSync, compute_stats};
use crate::application::fallback::DataSource;
use crate::application::session_manager::SessionGate;
use crate::domain::entity::decision::{Decision, DecisionStats};
use crate::domain::repository::{DecisionCache, RemoteDecisionService};
use crate::domain::value_object::FreelancerId;
use crate::error::{EngagementError, EngagementResult};

const TASK_NAME: &str = "decision-poller";

/// Latest known view of the signed-in freelancer's decisions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionFeed {
    /// `None` while nobody is signed in
    pub freelancer_id: Option<FreelancerId>,
    pub decisions: Vec<Decision>,
    pub stats: DecisionStats,
    pub source: DataSource,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Number of refreshes published so far
    pub tick: u64,
}

/// Handle to the running poller
pub struct DecisionPoller {
    task: PeriodicTask,
    feed_rx: watch::Receiver<DecisionFeed>,
}

impl DecisionPoller {
    /// Start polling on the current tokio runtime; the first refresh runs immediately
    pub fn spawn<R, C, G>(sync: Arc<DecisionSync<R, C, G>>, period: Duration) -> Self
    where
        R: RemoteDecisionService + Send + Sync + 'static,
        C: DecisionCache + Send + Sync + 'static,
        G: SessionGate + Send + Sync + 'static,
    {
        let (feed_tx, feed_rx) = watch::channel(DecisionFeed::default());
        let feed_tx = Arc::new(feed_tx);
        let mut ticks = 0u64;

        let task = PeriodicTask::spawn(TASK_NAME, period, move |liveness| {
            let sync = sync.clone();
            let feed_tx = feed_tx.clone();
            ticks += 1;
            let tick = ticks;

            async move {
                let scoped = sync.fetch_for_active_session().await;

                if !liveness.is_alive() {
                    tracing::debug!(tick, "Discarding decision refresh that finished after stop");
                    return;
                }

                let feed = match scoped {
                    Some(scoped) => DecisionFeed {
                        stats: compute_stats(&scoped.resolved.value),
                        freelancer_id: Some(scoped.freelancer_id),
                        decisions: scoped.resolved.value,
                        source: scoped.resolved.source,
                        refreshed_at: Some(sync.now()),
                        tick,
                    },
                    None => DecisionFeed {
                        refreshed_at: Some(sync.now()),
                        tick,
                        ..DecisionFeed::default()
                    },
                };

                tracing::debug!(
                    tick,
                    count = feed.decisions.len(),
                    unread = feed.stats.unread,
                    source = ?feed.source,
                    "Decision feed refreshed"
                );
                feed_tx.send_replace(feed);
            }
        });

        Self { task, feed_rx }
    }

    /// Receiver that observes every published feed
    pub fn subscribe(&self) -> watch::Receiver<DecisionFeed> {
        self.feed_rx.clone()
    }

    /// Most recently published feed
    pub fn latest(&self) -> DecisionFeed {
        self.feed_rx.borrow().clone()
    }

    /// Cancel the timer and wait for the loop to exit
    pub async fn stop(&mut self) -> EngagementResult<()> {
        self.task
            .stop()
            .await
            .map_err(|e| EngagementError::Internal(e.to_string()))?;
        tracing::info!(task = TASK_NAME, "Decision poller stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.task.is_running()
    }
}
