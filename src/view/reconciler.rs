//! List reconciler
//!
//! Computes the minimal set of view operations that transform a rendered
//! task list into one matching new data. The reconciler never sorts: the
//! caller pre-sorts the task sequence (see `sort_tasks_by_priority`) so
//! ordering and reconciliation stay independently testable. Reordering a
//! surviving row is expressed as position metadata, never as a
//! remove-plus-add, so node-local transient state survives.

use crate::model::{Priority, Task};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Snapshot of a single rendered task row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNode {
    pub title: String,
    pub priority: Priority,
    pub completed: bool,
    /// Human-readable due text ("Today", "3 d. left", ...); empty without a due date
    pub due_display: String,
    /// Reminder time as shown in the row; empty without a reminder
    pub reminder_display: String,
}

impl RenderedNode {
    /// Build the rendered form of a task as of the given day
    pub fn from_task(task: &Task, today: NaiveDate) -> Self {
        Self {
            title: task.title.clone(),
            priority: task.priority,
            completed: task.completed,
            due_display: task
                .due_date
                .map(|due| due_display(due, today))
                .unwrap_or_default(),
            reminder_display: task.reminder_time.clone().unwrap_or_default(),
        }
    }
}

/// Human-readable distance between a due date and today
pub fn due_display(due: NaiveDate, today: NaiveDate) -> String {
    let days = due.signed_duration_since(today).num_days();

    if days == 0 {
        "Today".to_string()
    } else if days == 1 {
        "Tomorrow".to_string()
    } else if days < 0 {
        format!("Overdue {} d.", -days)
    } else {
        format!("{} d. left", days)
    }
}

/// Field-level changes for an existing row; None fields are untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeDelta {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    pub due_display: Option<String>,
    pub reminder_display: Option<String>,
}

impl NodeDelta {
    /// Diff two rendered nodes field by field, keeping unchanged
    /// sub-fields out of the delta
    fn between(old: &RenderedNode, new: &RenderedNode) -> Self {
        Self {
            title: (old.title != new.title).then(|| new.title.clone()),
            priority: (old.priority != new.priority).then_some(new.priority),
            completed: (old.completed != new.completed).then_some(new.completed),
            due_display: (old.due_display != new.due_display).then(|| new.due_display.clone()),
            reminder_display: (old.reminder_display != new.reminder_display)
                .then(|| new.reminder_display.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
            && self.due_display.is_none()
            && self.reminder_display.is_none()
    }
}

/// A single mutation to apply to the presentation surface
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    /// Insert a new row at `position` in the visible order
    Add {
        id: String,
        node: RenderedNode,
        position: usize,
    },
    /// Patch an existing row; `position` is set only when the row moved
    Update {
        id: String,
        delta: NodeDelta,
        position: Option<usize>,
    },
    /// Remove a row entirely
    Remove { id: String },
    /// Fade out all rows and swap to the empty-state marker
    ShowEmpty,
}

/// Rendered list snapshot: node content by id plus the visible order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    nodes: HashMap<String, RenderedNode>,
    order: Vec<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty view is one showing the empty-state marker
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn get(&self, id: &str) -> Option<&RenderedNode> {
        self.nodes.get(id)
    }

    /// Row ids in visible order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Apply reconcile output, producing the snapshot the next reconcile
    /// call should receive as its old view
    pub fn apply(&mut self, ops: &[ViewOp]) {
        for op in ops {
            match op {
                ViewOp::ShowEmpty => {
                    self.nodes.clear();
                    self.order.clear();
                }
                ViewOp::Remove { id } => {
                    self.nodes.remove(id);
                    self.order.retain(|o| o != id);
                }
                ViewOp::Add { id, node, position } => {
                    self.nodes.insert(id.clone(), node.clone());
                    let at = (*position).min(self.order.len());
                    self.order.insert(at, id.clone());
                }
                ViewOp::Update {
                    id,
                    delta,
                    position,
                } => {
                    if let Some(node) = self.nodes.get_mut(id) {
                        if let Some(title) = &delta.title {
                            node.title = title.clone();
                        }
                        if let Some(priority) = delta.priority {
                            node.priority = priority;
                        }
                        if let Some(completed) = delta.completed {
                            node.completed = completed;
                        }
                        if let Some(due) = &delta.due_display {
                            node.due_display = due.clone();
                        }
                        if let Some(reminder) = &delta.reminder_display {
                            node.reminder_display = reminder.clone();
                        }
                    }
                    if let Some(position) = position {
                        self.order.retain(|o| o != id);
                        let at = (*position).min(self.order.len());
                        self.order.insert(at, id.clone());
                    }
                }
            }
        }
    }
}

/// Compute the operations that bring `old_view` in line with `new_tasks`.
///
/// `new_tasks` must already be in display order; `today` anchors the
/// due-date display text. Applying the result to `old_view` and calling
/// reconcile again with the same tasks yields no operations.
pub fn reconcile(old_view: &ViewState, new_tasks: &[Task], today: NaiveDate) -> Vec<ViewOp> {
    // Transition to the empty state is a single signal, not per-row
    // removes, and is a no-op when the view is already empty.
    if new_tasks.is_empty() {
        return if old_view.is_empty() {
            Vec::new()
        } else {
            vec![ViewOp::ShowEmpty]
        };
    }

    let new_ids: HashSet<&str> = new_tasks.iter().map(|t| t.id.as_str()).collect();

    let mut ops = Vec::new();

    // Rows whose task no longer exists
    for id in &old_view.order {
        if !new_ids.contains(id.as_str()) {
            ops.push(ViewOp::Remove { id: id.clone() });
        }
    }

    // Predicted visible order as the ops so far would leave it, so
    // position metadata is only emitted for rows that actually end up
    // somewhere else.
    let mut predicted: Vec<&str> = old_view
        .order
        .iter()
        .map(String::as_str)
        .filter(|id| new_ids.contains(*id))
        .collect();

    for (position, task) in new_tasks.iter().enumerate() {
        let node = RenderedNode::from_task(task, today);

        match old_view.get(&task.id) {
            None => {
                predicted.insert(position.min(predicted.len()), &task.id);
                ops.push(ViewOp::Add {
                    id: task.id.clone(),
                    node,
                    position,
                });
            }
            Some(old_node) => {
                let delta = NodeDelta::between(old_node, &node);
                let moved = predicted.get(position).copied() != Some(task.id.as_str());
                if moved {
                    predicted.retain(|id| *id != task.id.as_str());
                    predicted.insert(position.min(predicted.len()), &task.id);
                }

                if !delta.is_empty() || moved {
                    ops.push(ViewOp::Update {
                        id: task.id.clone(),
                        delta,
                        position: moved.then_some(position),
                    });
                }
            }
        }
    }

    ops
}
