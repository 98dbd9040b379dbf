//! Reminders service
//!
//! Decides which tasks should fire a one-time notification. The
//! background scheduler calls `check_reminders` once per polling cycle;
//! the presentation layer never calls it directly.

use crate::model::Task;
use crate::notify::NotificationSink;
use crate::storage::TaskStore;
use chrono::{NaiveDateTime, Timelike};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reminders service driven by the background scheduler
#[derive(Clone)]
pub struct RemindersService {
    store: TaskStore,
    sink: Arc<dyn NotificationSink>,
    /// Persistence I/O is async, so overlapping checks are possible in
    /// principle; this guard skips a check while one is still in flight.
    in_flight: Arc<Mutex<()>>,
}

impl RemindersService {
    pub fn new(store: TaskStore, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            store,
            sink,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Check every task against the given wall-clock time and fire due
    /// reminders, at most once per arm cycle.
    ///
    /// Returns each task paired with whether it fired during this check.
    /// When a previous check is still in flight the cycle is skipped and
    /// an empty list is returned.
    pub async fn check_reminders(&self, now: NaiveDateTime) -> Vec<(Task, bool)> {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("Reminder check already running, skipping this cycle");
            return Vec::new();
        };

        let mut tasks = self.store.load().await;
        tracing::debug!("Checking reminders at {}", now.format("%H:%M"));

        let mut fired_ids: Vec<String> = Vec::new();

        for task in &mut tasks {
            if !reminder_due(task, now) {
                continue;
            }

            tracing::info!("Reminder fired for task \"{}\"", task.title);

            // Delivery is best-effort; the reminder counts as shown once
            // delivery has been attempted.
            self.sink.notify(task);
            task.reminder_shown = true;
            fired_ids.push(task.id.clone());
        }

        if !fired_ids.is_empty() {
            // Whole-collection replace. On failure the stored
            // reminder_shown stays false and the write is retried on the
            // next cycle that still matches.
            if let Err(e) = self.store.save(&tasks).await {
                tracing::error!("Failed to persist fired reminders: {}", e);
            }
        }

        tasks
            .into_iter()
            .map(|task| {
                let fired = fired_ids.iter().any(|id| *id == task.id);
                (task, fired)
            })
            .collect()
    }
}

/// A reminder is due when the task is still open, not yet shown, due on
/// the same calendar day as `now`, and its reminder time matches the
/// current hour and minute exactly.
///
/// Matching is exact-minute: a polling cadence coarser than one minute
/// can miss the window entirely, and a check that never runs during the
/// match minute drops the reminder. There is no catch-up logic; this is
/// a known limitation of the design. A missing or malformed reminder
/// time is treated as no reminder configured.
fn reminder_due(task: &Task, now: NaiveDateTime) -> bool {
    if task.completed || task.reminder_shown {
        return false;
    }

    let Some(due_date) = task.due_date else {
        return false;
    };
    if due_date != now.date() {
        return false;
    }

    let Some(reminder) = task.reminder_clock() else {
        return false;
    };

    reminder.hour() == now.hour() && reminder.minute() == now.minute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Priority;
    use chrono::{NaiveDate, Utc};
    use std::sync::Mutex as StdMutex;
    use tempfile::TempDir;
    use tokio::fs;

    /// Sink that records the titles it was asked to display
    #[derive(Default)]
    struct RecordingSink {
        delivered: StdMutex<Vec<String>>,
    }

    impl RecordingSink {
        fn deliveries(&self) -> Vec<String> {
            self.delivered.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, task: &Task) {
            self.delivered.lock().unwrap().push(task.title.clone());
        }
    }

    async fn create_test_service() -> (RemindersService, TaskStore, Arc<RecordingSink>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = TaskStore::new(temp_dir.path().to_path_buf());
        store.initialize().await.unwrap();

        let sink = Arc::new(RecordingSink::default());
        let service = RemindersService::new(store.clone(), sink.clone());

        (service, store, sink, temp_dir)
    }

    fn reminder_task(title: &str, due: NaiveDate, time: &str) -> Task {
        Task {
            id: title.to_string(),
            title: title.to_string(),
            priority: Priority::Medium,
            due_date: Some(due),
            reminder_time: Some(time.to_string()),
            completed: false,
            created_at: Utc::now(),
            reminder_shown: false,
        }
    }

    fn due_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[tokio::test]
    async fn test_fires_on_exact_minute_only() {
        let (service, store, sink, _temp) = create_test_service().await;

        store
            .save(&[reminder_task("Pay bill", due_day(), "14:30")])
            .await
            .unwrap();

        // One minute early: nothing fires
        let outcomes = service
            .check_reminders(due_day().and_hms_opt(14, 29, 0).unwrap())
            .await;
        assert!(!outcomes[0].1);
        assert!(sink.deliveries().is_empty());

        // Exact minute: fires, second precision ignored
        let outcomes = service
            .check_reminders(due_day().and_hms_opt(14, 30, 42).unwrap())
            .await;
        assert!(outcomes[0].1);
        assert!(outcomes[0].0.reminder_shown);
        assert_eq!(sink.deliveries(), vec!["Pay bill"]);

        // One minute late: already shown, nothing fires
        let outcomes = service
            .check_reminders(due_day().and_hms_opt(14, 31, 0).unwrap())
            .await;
        assert!(!outcomes[0].1);
        assert_eq!(sink.deliveries().len(), 1);
    }

    #[tokio::test]
    async fn test_fires_at_most_once_per_arm_cycle() {
        let (service, store, sink, _temp) = create_test_service().await;

        store
            .save(&[reminder_task("Standup", due_day(), "09:00")])
            .await
            .unwrap();

        let now = due_day().and_hms_opt(9, 0, 0).unwrap();
        for _ in 0..5 {
            service.check_reminders(now).await;
        }

        assert_eq!(sink.deliveries().len(), 1);

        let stored = store.load().await;
        assert!(stored[0].reminder_shown);
    }

    #[tokio::test]
    async fn test_skips_wrong_day() {
        let (service, store, sink, _temp) = create_test_service().await;

        store
            .save(&[reminder_task("Tomorrow", due_day(), "09:00")])
            .await
            .unwrap();

        let day_before = due_day().pred_opt().unwrap();
        service
            .check_reminders(day_before.and_hms_opt(9, 0, 0).unwrap())
            .await;

        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_skips_completed_and_unconfigured_tasks() {
        let (service, store, sink, _temp) = create_test_service().await;

        let mut completed = reminder_task("Completed", due_day(), "09:00");
        completed.completed = true;

        let mut no_due_date = reminder_task("No due date", due_day(), "09:00");
        no_due_date.id = "no-due".to_string();
        no_due_date.due_date = None;

        let mut no_time = reminder_task("No time", due_day(), "09:00");
        no_time.id = "no-time".to_string();
        no_time.reminder_time = None;

        store.save(&[completed, no_due_date, no_time]).await.unwrap();

        let outcomes = service
            .check_reminders(due_day().and_hms_opt(9, 0, 0).unwrap())
            .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|(_, fired)| !fired));
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_reminder_time_is_skipped_not_an_error() {
        let (service, store, sink, _temp) = create_test_service().await;

        store
            .save(&[reminder_task("Garbled", due_day(), "nine-ish")])
            .await
            .unwrap();

        let outcomes = service
            .check_reminders(due_day().and_hms_opt(9, 0, 0).unwrap())
            .await;

        assert!(!outcomes[0].1);
        assert!(sink.deliveries().is_empty());
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_reminder_armed() {
        let (service, store, sink, _temp) = create_test_service().await;

        store
            .save(&[reminder_task("Flaky disk", due_day(), "09:00")])
            .await
            .unwrap();

        // Block the temp-file path so the atomic write fails while reads
        // keep working.
        let temp_path = store.path().with_extension("tmp");
        fs::create_dir(&temp_path).await.unwrap();

        let now = due_day().and_hms_opt(9, 0, 0).unwrap();
        service.check_reminders(now).await;

        assert_eq!(sink.deliveries().len(), 1);
        let stored = store.load().await;
        assert!(
            !stored[0].reminder_shown,
            "a failed write must not disarm the reminder on disk"
        );

        // Next cycle in the same minute: the write succeeds and disarms.
        fs::remove_dir(&temp_path).await.unwrap();
        service.check_reminders(now).await;

        let stored = store.load().await;
        assert!(stored[0].reminder_shown);
    }

    #[tokio::test]
    async fn test_empty_store_checks_cleanly() {
        let (service, _store, sink, _temp) = create_test_service().await;

        let outcomes = service
            .check_reminders(due_day().and_hms_opt(9, 0, 0).unwrap())
            .await;

        assert!(outcomes.is_empty());
        assert!(sink.deliveries().is_empty());
    }
}
