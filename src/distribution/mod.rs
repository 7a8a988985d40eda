//! Task distributors.
//!
//! Hands the next piece of work in an organization's queue to an
//! assignee drawn from a pool:
//!
//! - [`RoundRobinDistributor`] — pure rotation over an ordered pool,
//!   with an atomic cursor safe under concurrent callers.
//! - [`ColocatedDistributor`] — rotation with an affinity override
//!   that keeps a case with the member already handling it.
//! - [`BulkTaskAssignment`] — validated batch hand-off of an
//!   organization's queue to one user, oldest and highest-priority
//!   first.
//!
//! Every selection is reported to the audit sink; a failing sink
//! never aborts an assignment.

mod bulk;
mod colocated;
mod round_robin;

pub use bulk::BulkTaskAssignment;
pub use colocated::ColocatedDistributor;
pub use round_robin::RoundRobinDistributor;
