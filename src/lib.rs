//! Case-distribution framework for appeals processing.
//!
//! Provides the rule engines that route board casework: task
//! distribution, judge/hearing-day assignment, and docket balancing,
//! layered on a task-tree state machine.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `TaskTree`, `Appeal`,
//!   `Hearing`, `HearingDay`, `SchedulePeriod`, `Directory`
//! - **`distribution`**: Round-robin and affinity-aware task
//!   distributors, bulk queue assignment
//! - **`schedule`**: Judge-to-hearing-day matching with availability
//!   and travel-board blackout constraints
//! - **`docket`**: Proportional allocation of decision capacity across
//!   the four dockets
//! - **`workflow`**: Hearing-disposition state machine over the task
//!   tree
//! - **`validation`**: Field-level form checks (court-remand intake)
//!
//! # Architecture
//!
//! The crate is a library-level contract invoked synchronously by the
//! surrounding system: callers hand in the domain stores
//! (`TaskTree`, `CaseRegistry`, `HearingRegistry`, `Directory`) and
//! each operation reads and mutates them as one unit. Multi-task
//! mutations run inside all-or-nothing transactions; assignment
//! decisions are reported to an injectable audit sink.

pub mod audit;
pub mod distribution;
pub mod docket;
pub mod error;
pub mod models;
pub mod schedule;
pub mod validation;
pub mod workflow;

pub use error::{Error, Result};
