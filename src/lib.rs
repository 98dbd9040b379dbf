//! Taskpad library
//!
//! Core logic of a personal task tracker: the durable task collection,
//! the reminder scheduler that fires one-time notifications, and the
//! list reconciler that keeps a rendered view in sync with task data.
//!
//! All rendering and input handling lives outside this crate. The view
//! layer drives the core through `RemindersService::check_reminders`,
//! `view::reconcile`, and `model::sort_tasks_by_priority`.

pub mod config;
pub mod error;
pub mod model;
pub mod notify;
pub mod services;
pub mod storage;
pub mod view;
