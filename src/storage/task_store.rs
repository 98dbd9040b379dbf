//! Persisted task collection
//!
//! Stores the whole task list as a single JSON document. Reads treat
//! missing or corrupt data as an empty collection; writes replace the
//! document atomically via a temp file and rename, so a reader never
//! observes a partial write. There is no field-level mutation API.

use crate::config::TASKS_FILE_NAME;
use crate::error::Result;
use crate::model::Task;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// File-backed store for the task collection
#[derive(Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// Create a store rooted at the given data directory
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            path: data_dir.join(TASKS_FILE_NAME),
        }
    }

    /// Initialize the store (create the data directory if needed)
    pub async fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        tracing::info!("Task store initialized at: {:?}", self.path);
        Ok(())
    }

    /// Load the task collection.
    ///
    /// Missing or unreadable data yields an empty collection, never an
    /// error. Malformed stored data is logged and treated the same way.
    pub async fn load(&self) -> Vec<Task> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read task store, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!("Stored task data is malformed, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Replace the whole task collection in a single write.
    ///
    /// Writes to a temp file first, then renames over the old document.
    pub async fn save(&self, tasks: &[Task]) -> Result<()> {
        let content = serde_json::to_string_pretty(tasks)?;

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Saved {} tasks to {:?}", tasks.len(), self.path);

        Ok(())
    }

    /// Path of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }
}
