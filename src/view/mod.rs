//! View module
//!
//! Presentation-facing types: the rendered list snapshot and the
//! reconciler that keeps it in sync with task data.

pub mod reconciler;

pub use reconciler::{due_display, reconcile, NodeDelta, RenderedNode, ViewOp, ViewState};
