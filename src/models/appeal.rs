//! Appeal (case) model and case registry.
//!
//! Every appeal belongs to exactly one docket and carries the flags
//! the docket coordinator balances on: priority (advanced-on-docket or
//! court-remanded), age (receipt date), and — for the direct-review
//! docket — a target decision date with a decision-time goal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{AppealId, IssueId, UserId};

/// The four dockets competing for decision capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocketKind {
    /// Pre-reform appeals processed under the legacy system.
    Legacy,
    /// Direct review: no new evidence, no hearing; decision-time goal.
    DirectReview,
    /// Evidence submission: 90-day evidence window, no hearing.
    EvidenceSubmission,
    /// Hearing: the appellant requested a board hearing.
    Hearing,
}

impl DocketKind {
    /// All dockets, in balancing order.
    pub const ALL: [DocketKind; 4] = [
        DocketKind::Legacy,
        DocketKind::DirectReview,
        DocketKind::EvidenceSubmission,
        DocketKind::Hearing,
    ];

    /// Stable name used in logs and serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            DocketKind::Legacy => "legacy",
            DocketKind::DirectReview => "direct_review",
            DocketKind::EvidenceSubmission => "evidence_submission",
            DocketKind::Hearing => "hearing",
        }
    }
}

/// An appeal awaiting decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appeal {
    /// Unique appeal identifier.
    pub id: AppealId,
    /// The docket this appeal waits on.
    pub docket: DocketKind,
    /// Advanced on docket (age or hardship).
    pub aod: bool,
    /// Remanded by the court of appeals.
    pub cavc: bool,
    /// Date the appeal was received.
    pub receipt_date: NaiveDate,
    /// Decision-time goal (direct-review docket).
    pub target_decision_date: Option<NaiveDate>,
    /// Stamp set once the appeal has been announced as upcoming;
    /// idempotent marking avoids re-notifying.
    pub docket_range_date: Option<NaiveDate>,
    /// Judge this appeal is tied to, if any. Tied appeals are excluded
    /// from general-population counts.
    pub tied_judge: Option<UserId>,
    /// Whether the appeal is ready for distribution.
    pub ready: bool,
    /// Closest regional office key, if known.
    pub regional_office: Option<String>,
    /// Decision issue ids on the appeal's decision, if decided.
    pub decision_issues: Vec<IssueId>,
}

impl Appeal {
    /// Creates an appeal.
    pub fn new(id: AppealId, docket: DocketKind, receipt_date: NaiveDate) -> Self {
        Self {
            id,
            docket,
            aod: false,
            cavc: false,
            receipt_date,
            target_decision_date: None,
            docket_range_date: None,
            tied_judge: None,
            ready: false,
            regional_office: None,
            decision_issues: Vec::new(),
        }
    }

    /// Marks the appeal advanced on docket.
    pub fn advanced_on_docket(mut self) -> Self {
        self.aod = true;
        self
    }

    /// Marks the appeal as remanded by the court.
    pub fn court_remanded(mut self) -> Self {
        self.cavc = true;
        self
    }

    /// Sets the target decision date.
    pub fn with_target_decision_date(mut self, date: NaiveDate) -> Self {
        self.target_decision_date = Some(date);
        self
    }

    /// Ties the appeal to a judge.
    pub fn tied_to_judge(mut self, judge: UserId) -> Self {
        self.tied_judge = Some(judge);
        self
    }

    /// Marks the appeal ready for distribution.
    pub fn ready_for_distribution(mut self) -> Self {
        self.ready = true;
        self
    }

    /// Sets the closest regional office.
    pub fn with_regional_office(mut self, key: impl Into<String>) -> Self {
        self.regional_office = Some(key.into());
        self
    }

    /// Adds a decision issue id.
    pub fn with_decision_issue(mut self, issue: IssueId) -> Self {
        self.decision_issues.push(issue);
        self
    }

    /// Priority appeals are distributed ahead of docket balancing.
    pub fn is_priority(&self) -> bool {
        self.aod || self.cavc
    }

    /// Whether the appeal is on the legacy docket.
    pub fn is_legacy(&self) -> bool {
        self.docket == DocketKind::Legacy
    }

    /// General population: not tied to a specific judge.
    pub fn is_genpop(&self) -> bool {
        self.tied_judge.is_none()
    }

    /// Age in days at `as_of`.
    pub fn age_in_days(&self, as_of: NaiveDate) -> i64 {
        (as_of - self.receipt_date).num_days()
    }
}

/// In-memory store of appeals, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseRegistry {
    appeals: BTreeMap<AppealId, Appeal>,
}

impl CaseRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) an appeal.
    pub fn insert(&mut self, appeal: Appeal) {
        self.appeals.insert(appeal.id, appeal);
    }

    /// Looks up an appeal.
    pub fn get(&self, id: AppealId) -> Option<&Appeal> {
        self.appeals.get(&id)
    }

    /// Mutable lookup.
    pub fn get_mut(&mut self, id: AppealId) -> Option<&mut Appeal> {
        self.appeals.get_mut(&id)
    }

    /// Iterates all appeals in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Appeal> {
        self.appeals.values()
    }

    /// Iterates one docket's appeals in id order.
    pub fn by_docket(&self, docket: DocketKind) -> impl Iterator<Item = &Appeal> {
        self.appeals.values().filter(move |a| a.docket == docket)
    }

    /// Next unused appeal id.
    pub fn next_id(&self) -> AppealId {
        self.appeals.keys().next_back().map_or(1, |id| id + 1)
    }

    /// Number of appeals.
    pub fn len(&self) -> usize {
        self.appeals.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.appeals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_priority_flags() {
        let base = Appeal::new(1, DocketKind::DirectReview, date(2023, 1, 1));
        assert!(!base.is_priority());
        assert!(base.clone().advanced_on_docket().is_priority());
        assert!(base.clone().court_remanded().is_priority());
        assert!(base.is_genpop());
        assert!(!base.tied_to_judge(7).is_genpop());
    }

    #[test]
    fn test_age_in_days() {
        let appeal = Appeal::new(1, DocketKind::Legacy, date(2023, 1, 1));
        assert_eq!(appeal.age_in_days(date(2023, 1, 31)), 30);
        assert!(appeal.is_legacy());
    }

    #[test]
    fn test_registry_by_docket() {
        let mut cases = CaseRegistry::new();
        cases.insert(Appeal::new(1, DocketKind::Legacy, date(2023, 1, 1)));
        cases.insert(Appeal::new(2, DocketKind::Hearing, date(2023, 1, 2)));
        cases.insert(Appeal::new(3, DocketKind::Hearing, date(2023, 1, 3)));

        assert_eq!(cases.by_docket(DocketKind::Hearing).count(), 2);
        assert_eq!(cases.by_docket(DocketKind::DirectReview).count(), 0);
        assert_eq!(cases.next_id(), 4);
        assert_eq!(cases.len(), 3);
    }
}
