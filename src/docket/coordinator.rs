//! Docket coordinator.
//!
//! Computes the share of nonpriority decision capacity each docket
//! should receive for a period. Priority appeals (advanced on docket
//! or court-remanded) are distributed ahead of docket balancing; the
//! remaining margin is split by nonpriority inventory, except that:
//!
//! - the direct-review docket observes a decision-time goal and is
//!   sized by its due (or about-to-be-due) inventory, floored at an
//!   interpolated minimum that ramps toward the pacesetting share as
//!   the docket ages, and capped at 80%;
//! - the legacy docket is floored at 10%, relaxed to its actual
//!   achievable share when fewer legacy appeals exist.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Appeal, AppealId, CaseRegistry, DocketKind};

use super::ProportionMap;

/// Floor on the legacy docket's share.
pub const MINIMUM_LEGACY_PROPORTION: f64 = 0.1;
/// Ceiling on the direct-review docket's share.
pub const MAXIMUM_DIRECT_REVIEW_PROPORTION: f64 = 0.8;
/// Damping applied to the interpolated direct-review minimum.
const INTERPOLATED_PROPORTION_ADJUSTMENT: f64 = 0.67;
/// Decision-time goal for a direct-review appeal, in days.
pub const DAYS_TO_DECISION_GOAL: i64 = 365;
/// Appeals this close to their goal count as due for distribution.
pub const DAYS_BEFORE_GOAL_DUE_FOR_DISTRIBUTION: i64 = 60;
/// Decisions per attorney in one distribution batch.
const BATCH_SIZE_PER_ATTORNEY: usize = 3;

/// Configured decision capacity and direct-review flow rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionCapacity {
    /// Attorneys across all judge teams.
    pub attorney_count: usize,
    /// Annual nonpriority direct-review receipts.
    pub nonpriority_receipts_per_year: f64,
    /// Annual nonpriority decision output, all dockets.
    pub nonpriority_decisions_per_year: f64,
}

/// Per-period docket balancer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocketCoordinator {
    capacity: DecisionCapacity,
    as_of: NaiveDate,
}

impl DocketCoordinator {
    /// Creates a coordinator for one scheduling period.
    ///
    /// `as_of` anchors age and due-date arithmetic; nothing reads a
    /// hidden clock.
    pub fn new(capacity: DecisionCapacity, as_of: NaiveDate) -> Self {
        Self { capacity, as_of }
    }

    /// Decision slots available in one distribution batch.
    pub fn total_batch_size(&self) -> usize {
        self.capacity.attorney_count * BATCH_SIZE_PER_ATTORNEY
    }

    /// Priority appeals ready for distribution, all dockets.
    pub fn priority_count(&self, cases: &CaseRegistry) -> usize {
        cases
            .iter()
            .filter(|a| a.is_priority() && a.ready)
            .count()
    }

    /// Priority appeals ready for distribution and not tied to a
    /// specific judge.
    pub fn genpop_priority_count(&self, cases: &CaseRegistry) -> usize {
        cases
            .iter()
            .filter(|a| a.is_priority() && a.ready && a.is_genpop())
            .count()
    }

    /// Nonpriority decision slots left after priority appeals.
    pub fn docket_margin_net_of_priority(&self, cases: &CaseRegistry) -> usize {
        self.total_batch_size()
            .saturating_sub(self.priority_count(cases))
    }

    /// Steady-state share of capacity the direct-review docket needs
    /// to keep pace with what is arriving.
    pub fn pacesetting_direct_review_proportion(&self) -> f64 {
        if self.capacity.nonpriority_decisions_per_year == 0.0 {
            return 0.0;
        }
        self.capacity.nonpriority_receipts_per_year / self.capacity.nonpriority_decisions_per_year
    }

    /// Minimum direct-review share, interpolated between 0 and the
    /// pacesetting proportion by how close the docket's oldest appeal
    /// is to coming due. Rounded to 3 decimal places.
    pub fn interpolated_minimum_direct_review_proportion(&self, cases: &CaseRegistry) -> f64 {
        let time_until_due_of_new = (DAYS_TO_DECISION_GOAL - DAYS_BEFORE_GOAL_DUE_FOR_DISTRIBUTION) as f64;
        let time_until_due_of_oldest = self
            .oldest_nonpriority_direct_review(cases)
            .map(|appeal| {
                (time_until_due_of_new - appeal.age_in_days(self.as_of) as f64).max(0.0)
            })
            .unwrap_or(time_until_due_of_new);

        let interpolator = 1.0 - time_until_due_of_oldest / time_until_due_of_new;
        round3(
            self.pacesetting_direct_review_proportion()
                * interpolator
                * INTERPOLATED_PROPORTION_ADJUSTMENT,
        )
    }

    /// Direct-review appeals due (or about to be due) by their goal.
    pub fn due_direct_review_count(&self, cases: &CaseRegistry) -> usize {
        let cutoff = self.as_of + Duration::days(DAYS_BEFORE_GOAL_DUE_FOR_DISTRIBUTION);
        self.nonpriority_ready(cases, DocketKind::DirectReview)
            .filter(|a| a.target_decision_date.is_some_and(|d| d <= cutoff))
            .count()
    }

    /// Effective direct-review share: due inventory as a fraction of
    /// the margin, floored at the interpolated minimum, capped at the
    /// configured ceiling.
    pub fn direct_review_proportion(&self, cases: &CaseRegistry) -> f64 {
        let margin = self.docket_margin_net_of_priority(cases);
        let due_share = if margin == 0 {
            0.0
        } else {
            self.due_direct_review_count(cases) as f64 / margin as f64
        };
        due_share
            .max(self.interpolated_minimum_direct_review_proportion(cases))
            .min(MAXIMUM_DIRECT_REVIEW_PROPORTION)
    }

    /// The share of nonpriority capacity each docket receives.
    ///
    /// Fractions sum to 1; floating-point residue is folded into the
    /// largest bucket.
    pub fn docket_proportions(&self, cases: &CaseRegistry) -> ProportionMap {
        let weights: BTreeMap<DocketKind, f64> = DocketKind::ALL
            .into_iter()
            .map(|docket| (docket, self.nonpriority_ready(cases, docket).count() as f64))
            .collect();
        let mut proportions = ProportionMap::normalized(weights);

        let margin = self.docket_margin_net_of_priority(cases);
        if margin == 0 {
            // Nothing but priority work this period; balancing the
            // nonpriority inventory is moot.
            proportions.reconcile();
            return proportions;
        }

        let direct_review = self.direct_review_proportion(cases);
        proportions.pin(&[(DocketKind::DirectReview, direct_review)]);

        if proportions.get(DocketKind::Legacy) < MINIMUM_LEGACY_PROPORTION {
            let legacy_inventory =
                self.nonpriority_ready(cases, DocketKind::Legacy).count() as f64 / margin as f64;
            let legacy = MINIMUM_LEGACY_PROPORTION.min(legacy_inventory);
            proportions.pin(&[
                (DocketKind::Legacy, legacy),
                (DocketKind::DirectReview, direct_review),
            ]);
        }

        proportions.reconcile();
        proportions
    }

    /// Hearings the board must hold over `years` to keep pace with the
    /// hearing docket's share of decisions.
    pub fn target_number_of_ama_hearings(&self, cases: &CaseRegistry, years: f64) -> u64 {
        let hearing_share = self.docket_proportions(cases).get(DocketKind::Hearing);
        (self.capacity.nonpriority_decisions_per_year * hearing_share * years).round() as u64
    }

    /// Hearing-docket appeals coming up for a hearing within `years`,
    /// skipping appeals already marked in range before `endpoint`.
    pub fn upcoming_appeals_in_range(
        &self,
        cases: &CaseRegistry,
        years: f64,
        endpoint: NaiveDate,
    ) -> Vec<AppealId> {
        let target = self.target_number_of_ama_hearings(cases, years) as usize;
        cases
            .by_docket(DocketKind::Hearing)
            .filter(|a| a.docket_range_date.map_or(true, |marked| marked >= endpoint))
            .take(target)
            .map(|a| a.id)
            .collect()
    }

    /// Marks the upcoming appeals as in range, stamping `endpoint`.
    /// Idempotent: a second call with the same endpoint returns the
    /// same set and changes nothing.
    pub fn mark_upcoming_appeals_in_range(
        &self,
        cases: &mut CaseRegistry,
        years: f64,
        endpoint: NaiveDate,
    ) -> Vec<AppealId> {
        let upcoming = self.upcoming_appeals_in_range(cases, years, endpoint);
        for id in &upcoming {
            if let Some(appeal) = cases.get_mut(*id) {
                appeal.docket_range_date = Some(endpoint);
            }
        }
        upcoming
    }

    fn nonpriority_ready<'a>(
        &self,
        cases: &'a CaseRegistry,
        docket: DocketKind,
    ) -> impl Iterator<Item = &'a Appeal> {
        cases
            .by_docket(docket)
            .filter(|a| !a.is_priority() && a.ready)
    }

    fn oldest_nonpriority_direct_review<'a>(&self, cases: &'a CaseRegistry) -> Option<&'a Appeal> {
        self.nonpriority_ready(cases, DocketKind::DirectReview)
            .min_by_key(|a| a.receipt_date)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
