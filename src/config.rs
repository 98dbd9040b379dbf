//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the crate.

use std::time::Duration;

// ===== Reminder Polling Cadence =====

/// Coarse polling interval for the reminder check loop.
/// Must stay at or below one minute: reminder matching is exact-minute,
/// so a coarser cadence can skip over the match window entirely.
pub const COARSE_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Fine polling interval used right after a reminder-bearing task is
/// created or edited, to cut the latency before its first eligible check.
pub const FINE_CHECK_INTERVAL: Duration = Duration::from_secs(5);

/// Number of fine-grained cycles to run after an acceleration request
/// before the loop reverts to the coarse interval (two minutes of fine
/// polling at the default intervals).
pub const FINE_CHECK_CYCLES: u32 = 24;

// ===== Validation Limits =====

/// Maximum length for a task title in characters.
/// Prevents excessively long values from being stored.
pub const MAX_TITLE_LENGTH: usize = 500;

/// Expected format for stored reminder times (24-hour wall clock).
pub const REMINDER_TIME_FORMAT: &str = "%H:%M";

// ===== Storage =====

/// File name of the persisted task collection inside the data directory.
pub const TASKS_FILE_NAME: &str = "tasks.json";
