//! Docket balancing.
//!
//! Computes, per scheduling period, the fractional share of decision
//! capacity each of the four dockets should receive, balancing
//! aging-priority cases against the direct-review docket's
//! pacesetting target, subject to floor/ceiling proportions.
//!
//! Proportion snapshots are recomputed on demand and never persisted.

mod coordinator;
mod proportions;

pub use coordinator::{
    DecisionCapacity, DocketCoordinator, DAYS_BEFORE_GOAL_DUE_FOR_DISTRIBUTION,
    DAYS_TO_DECISION_GOAL, MAXIMUM_DIRECT_REVIEW_PROPORTION, MINIMUM_LEGACY_PROPORTION,
};
pub use proportions::ProportionMap;
