//! Storage module
//!
//! Owns the durable task collection on disk.

pub mod task_store;

pub use task_store::TaskStore;
