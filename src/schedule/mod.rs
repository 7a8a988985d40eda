//! Hearing-schedule assignment.
//!
//! Matches judges to the unassigned central/video hearing days of a
//! schedule period, respecting explicit non-availability dates and
//! blackout windows synthesized around travel-board trips.
//!
//! The matcher is a greedy, most-constrained-first sweep with a
//! one-time shuffle of the day order — a constraint-satisfaction
//! heuristic, not an optimal matching. See [`JudgeAssigner`] for the
//! exact procedure and its known limitation.

mod assign_judges;
mod business_days;

pub use assign_judges::{JudgeAssigner, JudgeAssignment, JudgeRecord};
pub use business_days::{blackout_window, business_days_after, business_days_before, is_weekend};
