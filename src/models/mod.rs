//! Case-distribution domain models.
//!
//! Provides the core data types the distribution, scheduling, and
//! workflow subsystems operate on: appeals and their dockets, the
//! per-appeal task tree, hearings and hearing days, and the directory
//! of users and organizations.

mod appeal;
mod hearing;
mod party;
mod task;
mod task_tree;

pub use appeal::{Appeal, CaseRegistry, DocketKind};
pub use hearing::{
    Hearing, HearingDay, HearingDisposition, HearingRegistry, NonAvailability, SchedulePeriod,
    TravelBoardTrip,
};
pub use party::{org, Directory, Organization, StaffRecord, User};
pub use task::{Assignee, NewTask, Task, TaskStatus, TaskType};
pub use task_tree::TaskTree;

/// Task identifier.
pub type TaskId = u64;
/// Appeal identifier.
pub type AppealId = u64;
/// User identifier (ascending surrogate).
pub type UserId = u64;
/// Hearing identifier.
pub type HearingId = u64;
/// Hearing-day identifier.
pub type HearingDayId = u64;
/// Decision-issue identifier.
pub type IssueId = u64;
