//! Notification sink
//!
//! Delivery surface for fired reminders. Delivery is best-effort and
//! fire-and-forget: the reminder check marks a reminder shown once
//! delivery has been attempted, whether or not the sink succeeded.

use crate::model::Task;

/// Receives fired reminders for display
pub trait NotificationSink: Send + Sync {
    fn notify(&self, task: &Task);
}

/// Fallback sink that writes reminders to the log.
///
/// Used when no system notification surface is wired in.
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&self, task: &Task) {
        match (&task.reminder_time, &task.due_date) {
            (Some(time), Some(date)) => {
                tracing::info!(
                    "Notification: Task reminder: {} - due {} at {}",
                    task.title,
                    date,
                    time
                );
            }
            _ => {
                tracing::info!("Notification: Task reminder: {}", task.title);
            }
        }
    }
}
