//! Sync orchestrator.
//!
//! One orchestrator owns the cycle loop for one [`QuoteService`]. Triggers
//! (scheduler ticks and manual requests) arrive as [`SyncCommand`]s on a
//! single-consumer queue, so at most one cycle runs at a time. Triggers that
//! arrive while a cycle is in flight are coalesced into one follow-up cycle
//! whose outcome is delivered to every manual caller that was waiting.

mod status;

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::remote::{normalize_remote_batch, RemoteSource};
use crate::services::QuoteService;
use crate::storage::BlobStore;

pub use status::{SyncOutcome, SyncReport, SyncStatus};

const COMMAND_QUEUE_CAPACITY: usize = 16;

/// The orchestrator loop is no longer running
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("Sync orchestrator has stopped")]
pub struct OrchestratorStopped;

/// Messages processed by [`SyncOrchestrator::run`]
#[derive(Debug)]
pub enum SyncCommand {
    /// Scheduled trigger; nobody waits for its outcome
    Tick,
    /// User-initiated trigger; the outcome is sent back
    Manual(oneshot::Sender<SyncOutcome>),
    /// Stop the loop once the current cycle has finished
    Shutdown,
}

/// Cloneable front door to a running orchestrator.
#[derive(Clone)]
pub struct SyncHandle {
    commands: mpsc::Sender<SyncCommand>,
    status: watch::Receiver<SyncStatus>,
}

/// A queued manual sync waiting for its cycle to finish
#[derive(Debug)]
pub struct PendingSync {
    reply: oneshot::Receiver<SyncOutcome>,
}

impl PendingSync {
    pub async fn wait(self) -> Result<SyncOutcome, OrchestratorStopped> {
        self.reply.await.map_err(|_| OrchestratorStopped)
    }
}

impl SyncHandle {
    /// Queue a manual sync without waiting for it.
    pub async fn trigger(&self) -> Result<PendingSync, OrchestratorStopped> {
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(SyncCommand::Manual(reply))
            .await
            .map_err(|_| OrchestratorStopped)?;
        Ok(PendingSync { reply: receiver })
    }

    /// Queue a manual sync and wait for the cycle that serves it.
    pub async fn request_sync(&self) -> Result<SyncOutcome, OrchestratorStopped> {
        self.trigger().await?.wait().await
    }

    /// Queue a scheduled trigger. A full queue already holds a pending
    /// trigger, so the tick is dropped.
    pub fn tick(&self) -> Result<(), OrchestratorStopped> {
        match self.commands.try_send(SyncCommand::Tick) {
            Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => Ok(()),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(OrchestratorStopped),
        }
    }

    /// Ask the loop to stop after the cycle in flight, if any.
    pub async fn shutdown(&self) -> Result<(), OrchestratorStopped> {
        self.commands
            .send(SyncCommand::Shutdown)
            .await
            .map_err(|_| OrchestratorStopped)
    }

    pub fn status(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    pub fn current_status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }
}

pub struct SyncOrchestrator<S, R> {
    service: QuoteService<S>,
    remote: R,
    commands: mpsc::Receiver<SyncCommand>,
    command_sender: mpsc::WeakSender<SyncCommand>,
    status: watch::Sender<SyncStatus>,
}

impl<S: BlobStore, R: RemoteSource> SyncOrchestrator<S, R> {
    /// Build an orchestrator and the handle that drives it.
    ///
    /// The loop stops on [`SyncHandle::shutdown`] or once every handle and
    /// ticker is gone.
    pub fn new(service: QuoteService<S>, remote: R) -> (Self, SyncHandle) {
        let (sender, commands) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (status, status_receiver) = watch::channel(SyncStatus::Idle);
        let orchestrator = Self {
            service,
            remote,
            commands,
            command_sender: sender.downgrade(),
            status,
        };
        let handle = SyncHandle {
            commands: sender,
            status: status_receiver,
        };
        (orchestrator, handle)
    }

    pub fn service(&self) -> &QuoteService<S> {
        &self.service
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    /// Spawn a task that emits [`SyncCommand::Tick`] every `interval`,
    /// starting immediately. A cycle that outlasts the interval delays the
    /// next tick instead of bunching them up.
    ///
    /// The ticker never keeps the queue open on its own: it stops once the
    /// last [`SyncHandle`] is dropped. Returns `None` when no handle is alive.
    pub fn spawn_ticker(&self, interval: Duration) -> Option<JoinHandle<()>> {
        self.command_sender.upgrade()?;
        let weak_sender = self.command_sender.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(sender) = weak_sender.upgrade() else {
                    break;
                };
                match sender.try_send(SyncCommand::Tick) {
                    Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => {}
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
            tracing::debug!("Sync ticker stopped");
        }))
    }

    /// Process triggers until shutdown.
    pub async fn run(mut self) {
        tracing::info!(remote = %self.remote.describe(), "Sync orchestrator started");

        'outer: while let Some(command) = self.commands.recv().await {
            let mut waiting = Vec::new();
            match command {
                SyncCommand::Tick => {}
                SyncCommand::Manual(reply) => waiting.push(reply),
                SyncCommand::Shutdown => break,
            }

            loop {
                let outcome = self.run_cycle().await;
                for reply in waiting.drain(..) {
                    let _ = reply.send(outcome.clone());
                }

                let mut follow_up = false;
                let mut stop = false;
                while let Ok(command) = self.commands.try_recv() {
                    match command {
                        SyncCommand::Tick => follow_up = true,
                        SyncCommand::Manual(reply) => {
                            follow_up = true;
                            waiting.push(reply);
                        }
                        SyncCommand::Shutdown => stop = true,
                    }
                }

                if stop {
                    break 'outer;
                }
                if !follow_up {
                    break;
                }
                tracing::debug!(
                    waiting = waiting.len(),
                    "Coalesced triggers into one follow-up cycle"
                );
            }
        }

        tracing::info!("Sync orchestrator stopped");
    }

    /// Run one fetch-merge-persist cycle.
    ///
    /// The fetch runs without holding the quote book lock. A failed fetch or
    /// a failed save leaves replica and ledger exactly as they were.
    pub async fn run_cycle(&mut self) -> SyncOutcome {
        self.status.send_replace(SyncStatus::Syncing);
        let remote = self.remote.describe();
        tracing::info!(remote = %remote, "Sync started");

        let outcome = match self.remote.fetch().await {
            Err(error) => {
                tracing::warn!(remote = %remote, "Sync fetch failed: {error}");
                SyncOutcome::Failed(error.to_string())
            }
            Ok(raws) => {
                let batch = normalize_remote_batch(raws);
                match self.service.apply_remote_batch(batch).await {
                    Ok((merged, open_conflicts)) => {
                        let report = SyncReport {
                            added: merged.added,
                            updated: merged.updated,
                            conflicts: merged.conflict_count(),
                            open_conflicts,
                            finished_at: Utc::now(),
                        };
                        tracing::info!(
                            added = report.added,
                            updated = report.updated,
                            conflicts = report.conflicts,
                            open_conflicts = report.open_conflicts,
                            "Sync finished"
                        );
                        SyncOutcome::Completed(report)
                    }
                    Err(error) => {
                        tracing::warn!("Failed to save merged quotes: {error}");
                        SyncOutcome::Failed(format!("Failed to save merged quotes: {error}"))
                    }
                }
            }
        };

        self.status.send_replace(outcome.clone().into());
        outcome
    }
}
