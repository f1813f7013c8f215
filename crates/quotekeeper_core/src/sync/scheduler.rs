//! Periodic sync task with an explicit lifecycle.
//!
//! # Responsibility
//! - Run one sync at start and then on a fixed interval.
//! - Publish the latest outcome for the presentation layer.
//!
//! # Invariants
//! - Ticks run sequentially; missed ticks are skipped, not bunched.
//! - `stop` returns only after the task has exited.

use crate::repo::quote_repo::QuoteRepository;
use crate::store::quote_store::MergeReport;
use crate::sync::reconciler::{SharedQuoteService, SyncError, SyncReconciler};
use crate::sync::transport::QuoteTransport;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Latest scheduled sync outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// No tick has completed yet.
    Idle,
    Synced(MergeReport),
    /// The tick found another sync in flight.
    Skipped,
    Failed(String),
}

impl SyncStatus {
    /// User-facing status line.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Idle => "Waiting for first sync...",
            Self::Synced(_) => "Quotes synced with server!",
            Self::Skipped => "Sync already in progress.",
            Self::Failed(_) => "Failed to sync with server!",
        }
    }
}

/// Handle to a running periodic sync task.
pub struct SyncScheduler {
    shutdown: oneshot::Sender<()>,
    status: watch::Receiver<SyncStatus>,
    task: JoinHandle<()>,
}

impl SyncScheduler {
    /// Spawns the periodic sync task on the current tokio runtime.
    ///
    /// The first sync runs immediately.
    pub fn start<T, R>(
        transport: Arc<T>,
        service: Arc<SharedQuoteService<R>>,
        reconciler: Arc<SyncReconciler>,
        interval: Duration,
    ) -> Self
    where
        T: QuoteTransport + ?Sized + 'static,
        R: QuoteRepository + Send + 'static,
    {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);
        let period = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            info!(
                "event=sync_scheduler module=sync status=start interval_ms={}",
                period.as_millis()
            );
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let outcome = reconciler
                            .sync_once(transport.as_ref(), service.as_ref())
                            .await;
                        status_tx.send_replace(status_from(outcome));
                    }
                }
            }

            info!("event=sync_scheduler module=sync status=stopped");
        });

        Self {
            shutdown: shutdown_tx,
            status: status_rx,
            task,
        }
    }

    /// Returns a receiver observing every published outcome.
    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Signals the task to stop and waits for it to exit.
    ///
    /// An in-progress sync is allowed to finish first.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.task.await {
            warn!("event=sync_scheduler module=sync status=error error={err}");
        }
    }
}

fn status_from(outcome: Result<MergeReport, SyncError>) -> SyncStatus {
    match outcome {
        Ok(report) => SyncStatus::Synced(report),
        Err(SyncError::InFlight) => SyncStatus::Skipped,
        Err(err) => SyncStatus::Failed(err.to_string()),
    }
}
