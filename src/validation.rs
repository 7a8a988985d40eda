//! Field-level validation for caller-supplied forms.
//!
//! Validation problems are recoverable: they are reported as a
//! structured list of field-level issues, never a single opaque
//! string, so callers can surface them next to the offending inputs.
//!
//! The main form validated here is the court-remand intake
//! ([`CavcRemand`]): the record captured when the court of appeals
//! sends a decided appeal back to the board.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    Appeal, AppealId, CaseRegistry, IssueId, NewTask, TaskTree, TaskType, UserId,
};

/// A single field-level validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationProblem {
    /// Field the problem is attached to.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl ValidationProblem {
    /// Creates a problem.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// How the court decided the appeal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CavcDecisionType {
    /// Remanded for further action.
    Remand,
    /// Reversed outright.
    StraightReversal,
    /// Dismissed on the appellant's death.
    DeathDismissal,
}

/// Remand subtype. The board uses the initialisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemandSubtype {
    /// Joint motion remand. Must address every decision issue.
    Jmr,
    /// Joint motion partial remand.
    Jmpr,
    /// Memorandum decision on remand.
    Mdr,
}

/// Court-remand intake form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CavcRemand {
    /// Appeal the court decided.
    pub appeal_id: AppealId,
    /// User processing the form.
    pub created_by: Option<UserId>,
    /// The court's docket number.
    pub cavc_docket_number: String,
    /// Whether an attorney represents the appellant.
    pub represented_by_attorney: Option<bool>,
    /// Deciding judge's full name; must match the court's roster.
    pub cavc_judge_full_name: String,
    /// How the court decided.
    pub decision_type: CavcDecisionType,
    /// Remand subtype; required when the decision is a remand.
    pub remand_subtype: Option<RemandSubtype>,
    /// Date of the court's decision.
    pub decision_date: Option<NaiveDate>,
    /// Date of judgement; required unless the subtype is MDR.
    pub judgement_date: Option<NaiveDate>,
    /// Date of mandate; required unless the subtype is MDR.
    pub mandate_date: Option<NaiveDate>,
    /// Decision issues the court's decision addresses.
    pub decision_issue_ids: Vec<IssueId>,
    /// Instructions from the court.
    pub instructions: String,
}

impl CavcRemand {
    /// Validates the form against the appeal it references and the
    /// court's judge roster.
    ///
    /// Returns every detected problem, not just the first.
    pub fn validate(&self, appeal: &Appeal, judge_roster: &[String]) -> Vec<ValidationProblem> {
        let mut problems = Vec::new();

        if self.cavc_docket_number.is_empty() {
            problems.push(ValidationProblem::new("cavc_docket_number", "can't be blank"));
        }
        if self.represented_by_attorney.is_none() {
            problems.push(ValidationProblem::new("represented_by_attorney", "can't be blank"));
        }
        if !judge_roster.contains(&self.cavc_judge_full_name) {
            problems.push(ValidationProblem::new(
                "cavc_judge_full_name",
                format!("{} is not a recognized judge", self.cavc_judge_full_name),
            ));
        }
        if self.decision_date.is_none() {
            problems.push(ValidationProblem::new("decision_date", "can't be blank"));
        }
        if self.decision_issue_ids.is_empty() {
            problems.push(ValidationProblem::new("decision_issue_ids", "can't be blank"));
        }
        if self.instructions.is_empty() {
            problems.push(ValidationProblem::new("instructions", "can't be blank"));
        }

        if self.decision_type == CavcDecisionType::Remand && self.remand_subtype.is_none() {
            problems.push(ValidationProblem::new("remand_subtype", "can't be blank"));
        }

        if self.remand_subtype != Some(RemandSubtype::Mdr) {
            if self.judgement_date.is_none() {
                problems.push(ValidationProblem::new("judgement_date", "can't be blank"));
            }
            if self.mandate_date.is_none() {
                problems.push(ValidationProblem::new("mandate_date", "can't be blank"));
            }
        }

        if self.remand_subtype == Some(RemandSubtype::Jmr) {
            let uncovered = appeal
                .decision_issues
                .iter()
                .any(|issue| !self.decision_issue_ids.contains(issue));
            if uncovered {
                problems.push(ValidationProblem::new(
                    "decision_issue_ids",
                    "JMR remands must address all decision issues",
                ));
            }
        }

        problems
    }

    /// Whether the form is complete enough to open the remand stream.
    pub fn form_complete(&self) -> bool {
        self.judgement_date.is_some() && self.mandate_date.is_some()
    }

    /// Validates the form and, if complete, establishes the
    /// court-remand appeal stream: a new priority appeal carrying the
    /// contested issues, with a fresh root task.
    pub fn establish_stream(
        &self,
        cases: &mut CaseRegistry,
        tree: &mut TaskTree,
        judge_roster: &[String],
    ) -> Result<AppealId> {
        let source = cases
            .get(self.appeal_id)
            .ok_or(Error::AppealNotFound(self.appeal_id))?;

        let problems = self.validate(source, judge_roster);
        if !problems.is_empty() {
            return Err(Error::Invalid(problems));
        }

        let receipt_date = self.decision_date.unwrap_or(source.receipt_date);
        let mut stream = Appeal::new(cases.next_id(), source.docket, receipt_date).court_remanded();
        stream.decision_issues = self.decision_issue_ids.clone();
        let stream_id = stream.id;
        cases.insert(stream);

        tree.create(NewTask::new(
            stream_id,
            TaskType::Root,
            crate::models::Assignee::Organization(crate::models::org::BOARD.to_string()),
        ))?;

        Ok(stream_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocketKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn roster() -> Vec<String> {
        vec!["Mary K. Chen".to_string(), "Louis Abad".to_string()]
    }

    fn decided_appeal() -> Appeal {
        Appeal::new(1, DocketKind::DirectReview, date(2022, 1, 1))
            .with_decision_issue(11)
            .with_decision_issue(12)
    }

    fn complete_form() -> CavcRemand {
        CavcRemand {
            appeal_id: 1,
            created_by: Some(5),
            cavc_docket_number: "20-4321".into(),
            represented_by_attorney: Some(true),
            cavc_judge_full_name: "Mary K. Chen".into(),
            decision_type: CavcDecisionType::Remand,
            remand_subtype: Some(RemandSubtype::Jmr),
            decision_date: Some(date(2023, 3, 1)),
            judgement_date: Some(date(2023, 3, 10)),
            mandate_date: Some(date(2023, 3, 10)),
            decision_issue_ids: vec![11, 12],
            instructions: "Readjudicate under the corrected standard.".into(),
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        let problems = complete_form().validate(&decided_appeal(), &roster());
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn test_jmr_must_cover_all_decision_issues() {
        let mut form = complete_form();
        form.decision_issue_ids = vec![11];

        let problems = form.validate(&decided_appeal(), &roster());
        assert!(problems
            .iter()
            .any(|p| p.field == "decision_issue_ids"
                && p.message == "JMR remands must address all decision issues"));
    }

    #[test]
    fn test_jmpr_may_cover_a_subset() {
        let mut form = complete_form();
        form.remand_subtype = Some(RemandSubtype::Jmpr);
        form.decision_issue_ids = vec![11];

        let problems = form.validate(&decided_appeal(), &roster());
        assert!(problems.is_empty(), "{problems:?}");
    }

    #[test]
    fn test_mdr_skips_judgement_and_mandate() {
        let mut form = complete_form();
        form.remand_subtype = Some(RemandSubtype::Mdr);
        form.judgement_date = None;
        form.mandate_date = None;

        let problems = form.validate(&decided_appeal(), &roster());
        assert!(problems.is_empty(), "{problems:?}");
        assert!(!form.form_complete());
    }

    #[test]
    fn test_unknown_judge_and_blank_fields_collected_together() {
        let mut form = complete_form();
        form.cavc_judge_full_name = "Nobody".into();
        form.cavc_docket_number = String::new();
        form.instructions = String::new();

        let problems = form.validate(&decided_appeal(), &roster());
        let fields: Vec<&str> = problems.iter().map(|p| p.field.as_str()).collect();
        assert!(fields.contains(&"cavc_judge_full_name"));
        assert!(fields.contains(&"cavc_docket_number"));
        assert!(fields.contains(&"instructions"));
        assert_eq!(problems.len(), 3);
    }

    #[test]
    fn test_establish_stream_creates_priority_appeal() {
        let mut cases = CaseRegistry::new();
        cases.insert(decided_appeal());
        let mut tree = TaskTree::new();

        let stream_id = complete_form()
            .establish_stream(&mut cases, &mut tree, &roster())
            .unwrap();

        let stream = cases.get(stream_id).unwrap();
        assert!(stream.cavc);
        assert!(stream.is_priority());
        assert_eq!(stream.decision_issues, vec![11, 12]);
        assert_eq!(tree.tasks_for_appeal(stream_id).len(), 1);
    }

    #[test]
    fn test_establish_stream_rejects_invalid_form() {
        let mut cases = CaseRegistry::new();
        cases.insert(decided_appeal());
        let mut tree = TaskTree::new();

        let mut form = complete_form();
        form.decision_issue_ids = vec![11];

        let result = form.establish_stream(&mut cases, &mut tree, &roster());
        assert!(matches!(result, Err(Error::Invalid(_))));
        assert!(tree.is_empty());
        assert_eq!(cases.len(), 1);
    }
}
