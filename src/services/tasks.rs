//! Tasks service
//!
//! High-level business logic for task CRUD, completion, filtering, and
//! bulk clears. Every mutation re-reads the store and writes the whole
//! collection back, so a failed write leaves the stored state untouched.

use crate::config::MAX_TITLE_LENGTH;
use crate::error::{AppError, Result};
use crate::model::{CreateTaskRequest, Priority, Task, UpdateTaskRequest};
use crate::storage::TaskStore;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

/// Filter applied when listing tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskFilter {
    #[default]
    All,
    DueToday,
    HighPriority,
    Completed,
}

/// Service for managing tasks
#[derive(Clone)]
pub struct TasksService {
    store: TaskStore,
}

impl TasksService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Create a new task. New tasks go to the front of the stored
    /// collection so the newest bubbles to the top among equal standing.
    pub async fn create_task(&self, req: CreateTaskRequest) -> Result<Task> {
        let title = validate_title(&req.title)?;
        tracing::info!("Creating new task: {}", title);

        let task = Task {
            id: Uuid::new_v4().to_string(),
            title,
            priority: req.priority,
            due_date: req.due_date,
            reminder_time: req.reminder_time,
            completed: false,
            created_at: Utc::now(),
            reminder_shown: false,
        };

        let mut tasks = self.store.load().await;
        tasks.insert(0, task.clone());
        self.store.save(&tasks).await?;

        tracing::info!("Task created successfully: {}", task.id);

        Ok(task)
    }

    /// Edit a task. Changing the due date or reminder time re-arms the
    /// reminder so it can fire once more; other edits leave the fired
    /// state alone.
    pub async fn update_task(&self, req: UpdateTaskRequest) -> Result<Task> {
        let title = validate_title(&req.title)?;
        tracing::debug!("Updating task: {}", req.id);

        let mut tasks = self.store.load().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == req.id)
            .ok_or_else(|| AppError::TaskNotFound(req.id.clone()))?;

        if task.due_date != req.due_date || task.reminder_time != req.reminder_time {
            task.reminder_shown = false;
        }
        task.title = title;
        task.priority = req.priority;
        task.due_date = req.due_date;
        task.reminder_time = req.reminder_time;

        let updated = task.clone();
        self.store.save(&tasks).await?;

        tracing::debug!("Task updated successfully: {}", updated.id);

        Ok(updated)
    }

    /// Toggle the completion state of a task
    pub async fn toggle_completed(&self, id: &str) -> Result<Task> {
        let mut tasks = self.store.load().await;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| AppError::TaskNotFound(id.to_string()))?;

        task.completed = !task.completed;

        let updated = task.clone();
        self.store.save(&tasks).await?;

        tracing::debug!("Task {} marked {}", id, if updated.completed { "completed" } else { "open" });

        Ok(updated)
    }

    /// Delete a task
    pub async fn delete_task(&self, id: &str) -> Result<()> {
        let mut tasks = self.store.load().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        if tasks.len() == before {
            return Err(AppError::TaskNotFound(id.to_string()));
        }

        self.store.save(&tasks).await?;
        tracing::info!("Task deleted: {}", id);

        Ok(())
    }

    /// Remove every completed task, returning how many were removed
    pub async fn clear_completed(&self) -> Result<usize> {
        let mut tasks = self.store.load().await;
        let before = tasks.len();
        tasks.retain(|t| !t.completed);

        let removed = before - tasks.len();
        if removed > 0 {
            self.store.save(&tasks).await?;
        }

        tracing::info!("Cleared {} completed tasks", removed);

        Ok(removed)
    }

    /// Remove all tasks
    pub async fn clear_all(&self) -> Result<()> {
        self.store.save(&[]).await?;
        tracing::info!("Cleared all tasks");
        Ok(())
    }

    /// List tasks in stored order
    pub async fn list_tasks(&self) -> Vec<Task> {
        self.store.load().await
    }

    /// List tasks matching a filter. `today` anchors the due-today filter
    /// to a calendar day.
    pub async fn list_filtered(&self, filter: TaskFilter, today: NaiveDate) -> Vec<Task> {
        let tasks = self.store.load().await;

        match filter {
            TaskFilter::All => tasks,
            TaskFilter::DueToday => tasks
                .into_iter()
                .filter(|t| t.due_date == Some(today))
                .collect(),
            TaskFilter::HighPriority => tasks
                .into_iter()
                .filter(|t| t.priority == Priority::High)
                .collect(),
            TaskFilter::Completed => tasks.into_iter().filter(|t| t.completed).collect(),
        }
    }
}

/// Validate and normalize a task title
fn validate_title(raw: &str) -> Result<String> {
    let title = raw.trim();

    if title.is_empty() {
        return Err(AppError::Validation(
            "Task title must not be empty".to_string(),
        ));
    }

    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "Task title must be at most {} characters",
            MAX_TITLE_LENGTH
        )));
    }

    Ok(title.to_string())
}
