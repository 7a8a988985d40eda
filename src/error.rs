//! Operational error taxonomy.
//!
//! Three families, mirroring how callers are expected to react:
//!
//! - **Configuration** — the invocation cannot proceed as set up (empty
//!   assignee pool, no hearing days allocated, no judges). Fatal to the
//!   operation; surfaced unmodified; never retried here.
//! - **Infeasibility** — a deterministic run could not complete
//!   (`CannotAssignJudges`). Retrying the same inputs reproduces the
//!   failure, so the error carries enough context for a human.
//! - **Data consistency** — integration bugs (disposition mismatch,
//!   missing hearing association, invalid parent task). Fail fast,
//!   never coerce.
//!
//! Recoverable field-level validation problems are not in this enum;
//! they travel as `Vec<ValidationProblem>` inside [`Error::Invalid`].
//!
//! All variants propagate to the enclosing transaction boundary, which
//! unwinds any partial task-tree mutation.

use thiserror::Error;

use crate::models::{AppealId, HearingDayId, HearingDisposition, HearingId, TaskId, TaskType};
use crate::validation::ValidationProblem;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by distribution, scheduling, and workflow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A distributor was asked for an assignee but its pool is empty.
    #[error("assignee pool can't be blank")]
    EmptyAssigneePool,

    /// No unassigned video/central hearing days exist for the period.
    #[error("hearing days have not been allocated for the schedule period")]
    HearingDaysNotAllocated,

    /// No judge non-availability records were provided for the period.
    #[error("no judges provided for assignment")]
    NoJudgesProvided,

    /// The greedy sweep stalled before placing every hearing day.
    #[error("unable to assign judges: {unassigned} hearing day(s) could not be placed")]
    CannotAssignJudges { unassigned: usize },

    /// A disposition action was invoked but the hearing's recorded
    /// disposition does not match.
    #[error("hearing disposition is {actual:?}, expected {expected:?}")]
    DispositionMismatch {
        expected: HearingDisposition,
        actual: Option<HearingDisposition>,
    },

    /// A disposition task's hearing task has no associated hearing.
    #[error("task {task_id} has no associated hearing")]
    HearingAssociationMissing { task_id: TaskId },

    /// A task was created under a parent of the wrong type.
    #[error("{child:?} task requires a {required:?} parent")]
    InvalidParentTask { child: TaskType, required: TaskType },

    /// Task lookup failed.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// Hearing lookup failed.
    #[error("hearing {0} not found")]
    HearingNotFound(HearingId),

    /// Hearing day lookup failed.
    #[error("hearing day {0} not found")]
    HearingDayNotFound(HearingDayId),

    /// Appeal lookup failed.
    #[error("appeal {0} not found")]
    AppealNotFound(AppealId),

    /// Caller input failed validation; recoverable by correcting the
    /// listed fields.
    #[error("validation failed with {} problem(s)", .0.len())]
    Invalid(Vec<ValidationProblem>),
}
