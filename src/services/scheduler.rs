//! Reminder scheduler
//!
//! Owns the background polling loop that drives reminder checks. The
//! loop runs at a coarse cadence by default; after creating or editing a
//! reminder-bearing task the caller may accelerate polling, which runs a
//! bounded number of fine-grained cycles and then reverts to the coarse
//! cadence on its own.

use crate::config::{COARSE_CHECK_INTERVAL, FINE_CHECK_CYCLES, FINE_CHECK_INTERVAL};
use crate::services::RemindersService;
use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Polling cadence for the reminder check loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Coarse,
    Fine,
}

impl Cadence {
    pub fn period(self) -> Duration {
        match self {
            Cadence::Coarse => COARSE_CHECK_INTERVAL,
            Cadence::Fine => FINE_CHECK_INTERVAL,
        }
    }
}

/// Cadence for a given cycle index after an acceleration request: fine
/// for the first FINE_CHECK_CYCLES cycles, coarse from then on.
fn cadence_for_cycle(cycle: u32) -> Cadence {
    if cycle < FINE_CHECK_CYCLES {
        Cadence::Fine
    } else {
        Cadence::Coarse
    }
}

/// Scheduler service owning the reminder polling loop and its
/// cancellation handle
pub struct SchedulerService {
    reminders: RemindersService,
    handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl SchedulerService {
    pub fn new(reminders: RemindersService) -> Self {
        Self {
            reminders,
            handle: Arc::new(RwLock::new(None)),
        }
    }

    /// Start polling at the coarse cadence, with an immediate first check
    pub async fn start(&self) {
        self.respawn(FINE_CHECK_CYCLES).await;
        tracing::info!("Reminder scheduler started");
    }

    /// Switch to the fine cadence for a bounded number of cycles.
    ///
    /// Cancels the pending timer, checks immediately, then polls at the
    /// fine interval for FINE_CHECK_CYCLES cycles before reverting to the
    /// coarse cadence.
    pub async fn accelerate(&self) {
        self.respawn(0).await;
        tracing::info!(
            "Reminder polling accelerated for {} cycles",
            FINE_CHECK_CYCLES
        );
    }

    /// Stop the polling loop
    pub async fn shutdown(&self) {
        let mut handle = self.handle.write().await;
        if let Some(task) = handle.take() {
            task.abort();
            tracing::info!("Reminder scheduler shutdown");
        }
    }

    /// Whether the polling loop is currently running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Replace the running loop with a fresh one starting at the given
    /// cycle index. Starting past the fine window means coarse polling
    /// from the first sleep.
    async fn respawn(&self, start_cycle: u32) {
        let reminders = self.reminders.clone();
        let mut handle = self.handle.write().await;

        if let Some(old) = handle.take() {
            old.abort();
        }

        *handle = Some(tokio::spawn(async move {
            let mut cycle = start_cycle;
            loop {
                reminders
                    .check_reminders(Local::now().naive_local())
                    .await;

                tokio::time::sleep(cadence_for_cycle(cycle).period()).await;
                cycle = cycle.saturating_add(1);

                if cycle == FINE_CHECK_CYCLES {
                    tracing::debug!("Fine polling window over, reverting to coarse cadence");
                }
            }
        }));
    }
}
