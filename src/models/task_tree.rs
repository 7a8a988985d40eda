//! Task tree store.
//!
//! Holds every task, keyed by id, with parent/child links forming one
//! tree per appeal. The store owns id issuance, status transitions
//! with cascading closure, subtree cancellation, and an all-or-nothing
//! transaction wrapper used by workflows whose edits span several
//! tasks.
//!
//! # Closure cascade
//! Closing a task whose type cascades (see
//! [`TaskType::cascades_closure`]) force-closes its currently open
//! children with the same status and the same closed-at stamp;
//! cancellation additionally stamps the cancelling user.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::{AppealId, Assignee, NewTask, Task, TaskId, TaskStatus, TaskType, UserId};

/// In-memory store of all tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskTree {
    tasks: BTreeMap<TaskId, Task>,
    next_id: TaskId,
}

impl TaskTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Creates a task from a specification.
    ///
    /// Fails if the parent does not exist or the variant constrains
    /// its parent type (a disposition task must sit under a hearing
    /// task).
    pub fn create(&mut self, spec: NewTask) -> Result<TaskId> {
        if let Some(parent_id) = spec.parent {
            let parent = self.task(parent_id)?;
            if let Some(required) = spec.task_type.required_parent() {
                if parent.task_type != required {
                    return Err(Error::InvalidParentTask {
                        child: spec.task_type,
                        required,
                    });
                }
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tasks.insert(
            id,
            Task {
                id,
                appeal_id: spec.appeal_id,
                task_type: spec.task_type,
                status: TaskStatus::Assigned,
                assigned_to: spec.assigned_to,
                assigned_by: spec.assigned_by,
                parent: spec.parent,
                created_at: Utc::now(),
                closed_at: None,
                placed_on_hold_at: None,
                on_hold_duration_days: None,
                cancelled_by: None,
                instructions: spec.instructions,
            },
        );
        Ok(id)
    }

    /// Looks up a task.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Looks up a task, failing if absent.
    pub fn task(&self, id: TaskId) -> Result<&Task> {
        self.tasks.get(&id).ok_or(Error::TaskNotFound(id))
    }

    /// Direct children of a task, in creation order.
    pub fn children(&self, id: TaskId) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.parent == Some(id))
            .collect()
    }

    /// Open direct children of a task.
    pub fn open_children(&self, id: TaskId) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.parent == Some(id) && t.is_open())
            .collect()
    }

    /// All tasks for an appeal, in creation order.
    pub fn tasks_for_appeal(&self, appeal_id: AppealId) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| t.appeal_id == appeal_id)
            .collect()
    }

    /// Affinity lookup: the pool member holding an open task on the
    /// appeal, if any.
    pub fn open_task_assigned_to(&self, appeal_id: AppealId, pool: &[UserId]) -> Option<UserId> {
        self.tasks
            .values()
            .filter(|t| t.appeal_id == appeal_id && t.is_open())
            .find_map(|t| t.assigned_to.user_id().filter(|id| pool.contains(id)))
    }

    /// Active tasks of one type assigned to an organization, in
    /// creation order. Feeds bulk assignment.
    pub fn active_organization_tasks(&self, task_type: TaskType, organization: &str) -> Vec<&Task> {
        self.tasks
            .values()
            .filter(|t| {
                t.task_type == task_type
                    && t.is_active()
                    && matches!(&t.assigned_to, Assignee::Organization(name) if name == organization)
            })
            .collect()
    }

    /// Appends an instruction note to a task.
    pub fn add_instruction(&mut self, id: TaskId, note: impl Into<String>) -> Result<()> {
        let task = self.task_mut(id)?;
        task.instructions.push(note.into());
        Ok(())
    }

    /// Transitions a task's status.
    ///
    /// Reaching a terminal status stamps `closed_at` (and
    /// `cancelled_by` for cancellations) and, for cascading types,
    /// force-closes open children with the same status and stamp.
    pub fn set_status(&mut self, id: TaskId, status: TaskStatus, by: Option<UserId>) -> Result<()> {
        let closed_at = (!status.is_open()).then(Utc::now);
        let cancelled_by = (status == TaskStatus::Cancelled).then_some(by).flatten();

        let task = self.task_mut(id)?;
        task.status = status;
        task.closed_at = closed_at;
        if cancelled_by.is_some() {
            task.cancelled_by = cancelled_by;
        }
        let cascades = !status.is_open() && task.task_type.cascades_closure();

        if cascades {
            let open_children: Vec<TaskId> = self
                .open_children(id)
                .into_iter()
                .map(|t| t.id)
                .collect();
            for child_id in open_children {
                let child = self.task_mut(child_id)?;
                child.status = status;
                child.closed_at = closed_at;
                if cancelled_by.is_some() {
                    child.cancelled_by = cancelled_by;
                }
                tracing::debug!(parent = id, child = child_id, ?status, "closure cascaded");
            }
        }
        Ok(())
    }

    /// Places a task on a timed hold.
    pub fn place_on_hold(&mut self, id: TaskId, days: u32) -> Result<()> {
        let task = self.task_mut(id)?;
        task.status = TaskStatus::OnHold;
        task.placed_on_hold_at = Some(Utc::now());
        task.on_hold_duration_days = Some(days);
        Ok(())
    }

    /// Cancels a task and every open descendant.
    pub fn cancel_subtree(&mut self, id: TaskId, by: Option<UserId>) -> Result<()> {
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            for child in self.open_children(current) {
                pending.push(child.id);
            }
            let closed_at = Some(Utc::now());
            let task = self.task_mut(current)?;
            if task.is_open() {
                task.status = TaskStatus::Cancelled;
                task.closed_at = closed_at;
                task.cancelled_by = by;
            }
        }
        Ok(())
    }

    /// Cancels a hearing task's subtree and creates a fresh hearing
    /// task in its place (same appeal, parent, and assignee).
    ///
    /// Used when a postponed hearing must be attempted again.
    pub fn cancel_and_recreate(&mut self, hearing_task_id: TaskId) -> Result<TaskId> {
        let task = self.task(hearing_task_id)?;
        let mut spec = NewTask::new(task.appeal_id, task.task_type, task.assigned_to.clone());
        spec.parent = task.parent;
        spec.assigned_by = task.assigned_by;

        self.cancel_subtree(hearing_task_id, None)?;
        self.create(spec)
    }

    /// Runs `f` as one atomic unit: if it errors, the tree is restored
    /// to its pre-operation state.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut TaskTree) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                *self = snapshot;
                Err(error)
            }
        }
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterates all tasks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    fn task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks.get_mut(&id).ok_or(Error::TaskNotFound(id))
    }
}
