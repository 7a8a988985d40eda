//! Task (work item) model.
//!
//! A task is one node in a per-appeal tree of work items. Each task
//! has a type tag, a status, an assignee (a user, or an organization
//! acting as a pool), and an optional parent. Terminal statuses are
//! permanent markers; tasks are never physically deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AppealId, TaskId, UserId};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created and waiting for its assignee to act.
    Assigned,
    /// Being worked.
    InProgress,
    /// Parked, typically on a timed hold.
    OnHold,
    /// Finished successfully. Terminal.
    Completed,
    /// Closed without completion. Terminal.
    Cancelled,
}

impl TaskStatus {
    /// Whether the status is non-terminal.
    pub fn is_open(&self) -> bool {
        !matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    /// Whether the status counts as actively workable (open, not held).
    pub fn is_active(&self) -> bool {
        matches!(self, TaskStatus::Assigned | TaskStatus::InProgress)
    }
}

/// Closed set of task variants.
///
/// Behavior differences between variants (closure cascades, parent
/// requirements, disposition actions) dispatch on this tag rather
/// than on an inheritance chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Root of an appeal's tree.
    Root,
    /// Owns one hearing attempt; parent of the disposition task.
    Hearing,
    /// Work item to get a hearing on the calendar.
    ScheduleHearing,
    /// Records the hearing's outcome and drives the follow-up tree.
    AssignHearingDisposition,
    /// Transcribe a held hearing.
    Transcription,
    /// Hold the record open for late evidence.
    EvidenceSubmissionWindow,
    /// Follow up after an appellant no-show.
    NoShowHearing,
    /// Administrative prerequisite raised by hearings staff.
    HearingAdminAction,
    /// Untyped work item.
    Generic,
}

impl TaskType {
    /// Whether closing a task of this type force-closes its open
    /// children with the same status.
    pub fn cascades_closure(&self) -> bool {
        matches!(self, TaskType::AssignHearingDisposition)
    }

    /// Required parent type, if the variant constrains it.
    pub fn required_parent(&self) -> Option<TaskType> {
        match self {
            TaskType::AssignHearingDisposition => Some(TaskType::Hearing),
            _ => None,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Root => "Root",
            TaskType::Hearing => "Hearing",
            TaskType::ScheduleHearing => "Schedule hearing",
            TaskType::AssignHearingDisposition => "Select hearing disposition",
            TaskType::Transcription => "Transcription",
            TaskType::EvidenceSubmissionWindow => "Evidence submission window",
            TaskType::NoShowHearing => "No-show hearing follow-up",
            TaskType::HearingAdminAction => "Hearing admin action",
            TaskType::Generic => "Task",
        }
    }
}

/// Who a task is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignee {
    /// An individual user.
    User(UserId),
    /// An organization pool, by registry name.
    Organization(String),
}

impl Assignee {
    /// The user id, if assigned to an individual.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Assignee::User(id) => Some(*id),
            Assignee::Organization(_) => None,
        }
    }
}

/// A node in an appeal's task tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Owning appeal.
    pub appeal_id: AppealId,
    /// Variant tag.
    pub task_type: TaskType,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Current assignee.
    pub assigned_to: Assignee,
    /// User who made the assignment, if any.
    pub assigned_by: Option<UserId>,
    /// Parent task. `None` only for the root.
    pub parent: Option<TaskId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stamp set when the task reaches a terminal status.
    pub closed_at: Option<DateTime<Utc>>,
    /// Stamp set when the task is placed on hold.
    pub placed_on_hold_at: Option<DateTime<Utc>>,
    /// Length of the timed hold, in days.
    pub on_hold_duration_days: Option<u32>,
    /// User who cancelled the task, if cancelled.
    pub cancelled_by: Option<UserId>,
    /// Free-form instruction notes, oldest first.
    pub instructions: Vec<String>,
}

impl Task {
    /// Whether the task is in a non-terminal status.
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    /// Whether the task is actively workable.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Specification for a task to be created in a tree.
///
/// Ids and timestamps are issued by the tree at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTask {
    /// Owning appeal.
    pub appeal_id: AppealId,
    /// Variant tag.
    pub task_type: TaskType,
    /// Initial assignee.
    pub assigned_to: Assignee,
    /// User making the assignment.
    pub assigned_by: Option<UserId>,
    /// Parent task id, if not a root.
    pub parent: Option<TaskId>,
    /// Initial instruction notes.
    pub instructions: Vec<String>,
}

impl NewTask {
    /// Creates a task specification.
    pub fn new(appeal_id: AppealId, task_type: TaskType, assigned_to: Assignee) -> Self {
        Self {
            appeal_id,
            task_type,
            assigned_to,
            assigned_by: None,
            parent: None,
            instructions: Vec::new(),
        }
    }

    /// Sets the parent task.
    pub fn with_parent(mut self, parent: TaskId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Sets the assigning user.
    pub fn with_assigned_by(mut self, user: UserId) -> Self {
        self.assigned_by = Some(user);
        self
    }

    /// Adds an instruction note.
    pub fn with_instruction(mut self, note: impl Into<String>) -> Self {
        self.instructions.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_openness() {
        assert!(TaskStatus::Assigned.is_open());
        assert!(TaskStatus::InProgress.is_open());
        assert!(TaskStatus::OnHold.is_open());
        assert!(!TaskStatus::Completed.is_open());
        assert!(!TaskStatus::Cancelled.is_open());

        assert!(TaskStatus::Assigned.is_active());
        assert!(!TaskStatus::OnHold.is_active());
        assert!(!TaskStatus::Cancelled.is_active());
    }

    #[test]
    fn test_type_policies() {
        assert!(TaskType::AssignHearingDisposition.cascades_closure());
        assert!(!TaskType::Generic.cascades_closure());
        assert_eq!(
            TaskType::AssignHearingDisposition.required_parent(),
            Some(TaskType::Hearing)
        );
        assert_eq!(TaskType::Transcription.required_parent(), None);
    }

    #[test]
    fn test_assignee_user_id() {
        assert_eq!(Assignee::User(3).user_id(), Some(3));
        assert_eq!(Assignee::Organization("mail-team".into()).user_id(), None);
    }
}
