//! Task model
//!
//! Rust structs representing the persisted task collection.
//! All models use serde for serialization to the store and frontend;
//! persisted field names are camelCase to match the stored document.

use crate::config::REMINDER_TIME_FORMAT;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority level of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Numeric rank used for sorting; higher ranks sort first
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A task with optional due date and one-shot reminder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    /// Calendar date the task is due (no time-of-day)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Wall-clock reminder time as "HH:MM"; meaningful only with a due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Set exactly once per arm cycle when the reminder fires;
    /// reset only by an edit that changes the due date or reminder time
    #[serde(default)]
    pub reminder_shown: bool,
}

impl Task {
    /// Parse the reminder time into a wall-clock time.
    ///
    /// Returns None when unset or malformed; a malformed value is treated
    /// as "no reminder configured", not as corruption.
    pub fn reminder_clock(&self) -> Option<NaiveTime> {
        let raw = self.reminder_time.as_deref()?;
        NaiveTime::parse_from_str(raw, REMINDER_TIME_FORMAT).ok()
    }
}

/// Create task request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_time: Option<String>,
}

/// Edit request carrying the full set of user-editable fields.
/// The edit form always submits complete state, so there are no
/// partial-update semantics here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub reminder_time: Option<String>,
}

/// Sort tasks by priority (high first), ties broken by most recently
/// created. Returns a new vector; the stored order is left untouched.
pub fn sort_tasks_by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}
