//! SyncScheduler - periodic, non-overlapping sync cycles.
//!
//! Runs one cycle immediately and then every interval. A cycle that is asked
//! to start while another is still in flight is skipped rather than queued,
//! so two merges never race against the same book. The loop stops when
//! [`SyncScheduler::shutdown`] is called, abandoning any in-flight fetch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::client::RemoteSyncClient;
use crate::websocket::{ConnectionManager, ServerMessage};
use crate::{with_book, SharedBook};

/// Summary of a cycle that changed the book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub conflicts: usize,
    pub added: usize,
    pub synced_at: DateTime<Utc>,
}

/// Result of one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncOutcome {
    /// Remote quotes changed the book
    Applied(SyncSummary),
    /// Remote quotes matched the book exactly
    Unchanged,
    /// Another cycle was already running
    Skipped,
    /// Fetch, decode or persist failed; the cycle was abandoned
    Failed { reason: String },
}

/// Clears the running flag when a cycle ends, however it ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct SyncScheduler {
    client: RemoteSyncClient,
    book: SharedBook,
    conn_manager: Arc<ConnectionManager>,
    interval: Duration,
    running: AtomicBool,
    shutdown: watch::Sender<bool>,
}

impl SyncScheduler {
    /// Create a scheduler. Nothing runs until [`SyncScheduler::spawn`].
    pub fn new(
        client: RemoteSyncClient,
        book: SharedBook,
        conn_manager: Arc<ConnectionManager>,
        interval: Duration,
    ) -> Arc<Self> {
        let (shutdown, _) = watch::channel(false);
        Arc::new(Self {
            client,
            book,
            conn_manager,
            interval,
            running: AtomicBool::new(false),
            shutdown,
        })
    }

    /// Whether a cycle is in flight.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run one sync cycle now, unless one is already running.
    pub async fn run_once(&self) -> SyncOutcome {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Sync already in progress, skipping cycle");
            return SyncOutcome::Skipped;
        }
        let _guard = RunningGuard(&self.running);

        // Fetch without holding the book lock
        let remote = match self.client.fetch().await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(url = %self.client.url(), "Sync fetch failed: {}", e);
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let applied = with_book(&self.book, move |book| book.apply_remote(remote)).await;

        let applied = match applied {
            Ok(Ok(applied)) => applied,
            Ok(Err(e)) => {
                tracing::error!("Failed to persist synced quotes: {}", e);
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
            Err(e) => {
                tracing::error!("Sync merge task failed: {}", e);
                return SyncOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let Some(refresh) = applied.refresh else {
            tracing::debug!("Sync found no changes");
            return SyncOutcome::Unchanged;
        };

        let synced_at = Utc::now();
        let report = applied.report;
        tracing::info!(
            conflicts = report.conflict_count(),
            added = report.added_count(),
            "{}",
            report.summary()
        );

        let sent = self.conn_manager.broadcast_all(ServerMessage::sync_applied(
            &report,
            refresh.categories,
            refresh.view,
            synced_at,
        ));
        tracing::debug!(sent_to = sent, "Broadcast sync summary");

        SyncOutcome::Applied(SyncSummary {
            conflicts: report.conflict_count(),
            added: report.added_count(),
            synced_at,
        })
    }

    /// Start the periodic loop on the runtime.
    ///
    /// The first cycle runs immediately. Ticks missed while a cycle was slow
    /// are dropped rather than fired in a burst.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let mut shutdown_rx = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(this.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                url = %this.client.url(),
                interval_secs = this.interval.as_secs(),
                "Sync scheduler started"
            );

            loop {
                if *shutdown_rx.borrow() {
                    break;
                }

                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = this.run_once() => {}
                            _ = shutdown_rx.changed() => break,
                        }
                    }
                }
            }

            tracing::info!("Sync scheduler stopped");
        })
    }

    /// Stop the periodic loop.
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}
