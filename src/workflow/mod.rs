//! Hearing-disposition workflow.
//!
//! Reacts to a hearing's recorded outcome by creating, cancelling, or
//! rescheduling tasks in the appeal's tree. Every mutation — the
//! disposition write plus its task-tree edits — executes as one atomic
//! unit; partial application is never observable.

mod disposition;

pub use disposition::{
    AdminActionSpec, AfterDisposition, DispositionUpdate, HearingWorkflow, TaskAction,
    NO_SHOW_HOLD_DAYS,
};
