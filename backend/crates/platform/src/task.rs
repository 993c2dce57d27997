//! Cancellable periodic tasks
//!
//! [`PeriodicTask::spawn`] runs an async tick on a fixed interval until the
//! returned handle is stopped or dropped. The first tick fires immediately.
//!
//! A tick that is already running when the task is stopped is allowed to
//! finish; it receives a [`Liveness`] probe and must check it before
//! publishing anything, so results that land after teardown are discarded.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Errors raised while stopping a task
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Periodic task '{name}' failed: {source}")]
    Join {
        name: &'static str,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// Read-only view of whether the owning task is still alive
#[derive(Debug, Clone)]
pub struct Liveness {
    shutdown_rx: watch::Receiver<bool>,
}

impl Liveness {
    /// `false` once the owner stopped or dropped the task
    pub fn is_alive(&self) -> bool {
        !*self.shutdown_rx.borrow()
    }
}

/// Handle to a running periodic task
///
/// Dropping the handle signals shutdown as well, so a forgotten handle
/// never leaves an orphaned timer behind.
pub struct PeriodicTask {
    name: &'static str,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawn `tick` every `period` on the current tokio runtime
    pub fn spawn<F, Fut>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut(Liveness) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let liveness = Liveness {
            shutdown_rx: shutdown_rx.clone(),
        };

        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::debug!(
                task = name,
                period_ms = period.as_millis() as u64,
                "Periodic task started"
            );

            loop {
                tokio::select! {
                    biased;

                    _ = shutdown_rx.changed() => break,
                    _ = timer.tick() => tick(liveness.clone()).await,
                }
            }

            tracing::debug!(task = name, "Periodic task stopped");
        });

        Self {
            name,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Signal shutdown and wait for the loop (and any in-flight tick) to end
    ///
    /// Calling `stop` twice is harmless.
    pub async fn stop(&mut self) -> Result<(), TaskError> {
        let _ = self.shutdown_tx.send(true);

        if let Some(handle) = self.handle.take() {
            handle.await.map_err(|source| TaskError::Join {
                name: self.name,
                source,
            })?;
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_task(period: Duration) -> (PeriodicTask, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let task = PeriodicTask::spawn("counter", period, move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (task, count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_immediately_then_on_interval() {
        let (mut task, count) = counting_task(Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(125)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        task.stop().await.unwrap();
        assert!(!task.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        let (mut task, count) = counting_task(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;
        task.stop().await.unwrap();
        let after_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);

        // second stop is a no-op
        task.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (task, count) = counting_task(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;
        drop(task);
        let after_drop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_tick_sees_shutdown() {
        let published = Arc::new(AtomicUsize::new(0));
        let discarded = Arc::new(AtomicUsize::new(0));
        let (p, d) = (published.clone(), discarded.clone());

        let mut task = PeriodicTask::spawn("slow", Duration::from_secs(60), move |liveness| {
            let (p, d) = (p.clone(), d.clone());
            async move {
                tokio::time::sleep(Duration::from_secs(10)).await;
                if liveness.is_alive() {
                    p.fetch_add(1, Ordering::SeqCst);
                } else {
                    d.fetch_add(1, Ordering::SeqCst);
                }
            }
        });

        // first tick is in flight (sleeping) when we stop
        tokio::time::sleep(Duration::from_secs(1)).await;
        task.stop().await.unwrap();

        assert_eq!(published.load(Ordering::SeqCst), 0);
        assert_eq!(discarded.load(Ordering::SeqCst), 1);
    }
}
