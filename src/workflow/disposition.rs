//! Disposition actions on the task tree.
//!
//! A disposition task sits under its hearing task and records what the
//! hearing's outcome means for the appeal's remaining work:
//!
//! - **held** — legacy appeals complete the task outright; AMA appeals
//!   get a transcription task and, unless waived, an
//!   evidence-submission-window task.
//! - **cancelled** — the task is cancelled; AMA appeals get an
//!   evidence window under the hearing task's parent.
//! - **no-show** — a follow-up task goes on a timed hold.
//! - **postponed** — the hearing subtree is cancelled and recreated,
//!   either rescheduled onto a new slot or handed back to scheduling.
//!
//! Each action first checks the hearing's recorded disposition; a
//! mismatch is an integration bug and fails loudly before any edit.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    org, AppealId, Assignee, CaseRegistry, Directory, Hearing, HearingDayId, HearingDisposition,
    HearingId, HearingRegistry, NewTask, TaskId, TaskStatus, TaskTree, TaskType, UserId,
};
use crate::validation::ValidationProblem;

/// Days a no-show follow-up waits for late-arriving mail.
pub const NO_SHOW_HOLD_DAYS: u32 = 25;

const NO_SHOW_HOLD_INSTRUCTIONS: &str =
    "Mail must be received within 14 days of the original hearing date.";

/// Admin work to raise alongside a schedule-later follow-up.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminActionSpec {
    /// Instructions for the admin task.
    pub instructions: Option<String>,
}

/// Caller-chosen follow-up for a postponed hearing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AfterDisposition {
    /// Slot a new hearing immediately on the given day.
    Reschedule {
        /// Day for the replacement hearing.
        hearing_day_id: HearingDayId,
    },
    /// Hand the appeal back to hearing scheduling.
    ScheduleLater {
        /// Optional admin prerequisite under the new schedule task.
        admin_action: Option<AdminActionSpec>,
    },
}

/// An action a user may take on a disposition task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskAction {
    /// Postpone the hearing and pick a follow-up.
    PostponeHearing,
}

/// A disposition change plus its follow-up, applied as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispositionUpdate {
    /// Outcome to record on the hearing.
    pub disposition: HearingDisposition,
    /// Follow-up action; required when postponing.
    pub after: Option<AfterDisposition>,
    /// Note appended to the disposition task.
    pub instructions: Option<String>,
}

/// Executes disposition actions against the task tree and hearing
/// store as atomic units.
#[derive(Debug)]
pub struct HearingWorkflow<'a> {
    tree: &'a mut TaskTree,
    hearings: &'a mut HearingRegistry,
    cases: &'a CaseRegistry,
}

impl<'a> HearingWorkflow<'a> {
    /// Creates a workflow over the given stores.
    pub fn new(
        tree: &'a mut TaskTree,
        hearings: &'a mut HearingRegistry,
        cases: &'a CaseRegistry,
    ) -> Self {
        Self {
            tree,
            hearings,
            cases,
        }
    }

    /// Creates a disposition task under a hearing task and associates
    /// the hearing with it.
    pub fn create_disposition_task(
        &mut self,
        appeal_id: AppealId,
        hearing_task: TaskId,
        hearing_id: HearingId,
    ) -> Result<TaskId> {
        let task_id = self.tree.create(
            NewTask::new(
                appeal_id,
                TaskType::AssignHearingDisposition,
                Assignee::Organization(org::BOARD.to_string()),
            )
            .with_parent(hearing_task),
        )?;
        self.hearings.associate(hearing_task, hearing_id)?;
        Ok(task_id)
    }

    /// Actions `user` may take on a disposition task. Postponing is
    /// offered to hearings-management members only.
    pub fn available_actions(
        &self,
        task_id: TaskId,
        user: UserId,
        directory: &Directory,
    ) -> Result<Vec<TaskAction>> {
        let task = self.tree.task(task_id)?;
        let manages_hearings = directory
            .organization(org::HEARINGS_MANAGEMENT)
            .map_or(false, |organization| organization.is_member(user));

        if task.task_type == TaskType::AssignHearingDisposition && task.is_open() && manages_hearings
        {
            Ok(vec![TaskAction::PostponeHearing])
        } else {
            Ok(Vec::new())
        }
    }

    /// Records a disposition and runs its action in one transaction.
    pub fn apply(
        &mut self,
        task_id: TaskId,
        update: DispositionUpdate,
        user: Option<UserId>,
    ) -> Result<Vec<TaskId>> {
        self.transact(|w| {
            let hearing_id = w.hearing_for(task_id)?.id;
            w.hearings.set_disposition(hearing_id, update.disposition)?;

            let created = match update.disposition {
                HearingDisposition::Held => w.hold_inner(task_id)?,
                HearingDisposition::Cancelled => w.cancel_inner(task_id, user)?,
                HearingDisposition::NoShow => w.no_show_inner(task_id)?,
                HearingDisposition::Postponed => {
                    let after = update.after.clone().ok_or_else(|| {
                        Error::Invalid(vec![ValidationProblem::new(
                            "after",
                            "a follow-up action is required to postpone",
                        )])
                    })?;
                    w.postpone_inner(task_id, after, update.instructions.clone())?
                }
            };

            if let Some(note) = &update.instructions {
                w.tree.add_instruction(task_id, note.clone())?;
            }
            Ok(created)
        })
    }

    /// Completes the task (legacy) or creates the post-hearing tasks
    /// (AMA) for a held hearing.
    pub fn hold(&mut self, task_id: TaskId) -> Result<Vec<TaskId>> {
        self.transact(|w| w.hold_inner(task_id))
    }

    /// Cancels the task for a cancelled hearing.
    pub fn cancel(&mut self, task_id: TaskId, user: Option<UserId>) -> Result<Vec<TaskId>> {
        self.transact(|w| w.cancel_inner(task_id, user))
    }

    /// Creates the timed no-show follow-up.
    pub fn no_show(&mut self, task_id: TaskId) -> Result<Vec<TaskId>> {
        self.transact(|w| w.no_show_inner(task_id))
    }

    /// Reschedules or hands back to scheduling after a postponement.
    pub fn postpone(
        &mut self,
        task_id: TaskId,
        after: AfterDisposition,
        instructions: Option<String>,
    ) -> Result<Vec<TaskId>> {
        self.transact(|w| w.postpone_inner(task_id, after, instructions))
    }

    fn hold_inner(&mut self, task_id: TaskId) -> Result<Vec<TaskId>> {
        let hearing = self.check_disposition(task_id, HearingDisposition::Held)?;
        let evidence_window_waived = hearing.evidence_window_waived;

        let appeal_id = self.tree.task(task_id)?.appeal_id;
        let appeal = self
            .cases
            .get(appeal_id)
            .ok_or(Error::AppealNotFound(appeal_id))?;

        if appeal.is_legacy() {
            self.tree.set_status(task_id, TaskStatus::Completed, None)?;
            return Ok(Vec::new());
        }

        let mut created = vec![self.tree.create(
            NewTask::new(
                appeal_id,
                TaskType::Transcription,
                Assignee::Organization(org::TRANSCRIPTION_TEAM.to_string()),
            )
            .with_parent(task_id),
        )?];
        if !evidence_window_waived {
            created.push(self.tree.create(
                NewTask::new(
                    appeal_id,
                    TaskType::EvidenceSubmissionWindow,
                    Assignee::Organization(org::MAIL_TEAM.to_string()),
                )
                .with_parent(task_id),
            )?);
        }
        Ok(created)
    }

    fn cancel_inner(&mut self, task_id: TaskId, user: Option<UserId>) -> Result<Vec<TaskId>> {
        self.check_disposition(task_id, HearingDisposition::Cancelled)?;

        let task = self.tree.task(task_id)?;
        let appeal_id = task.appeal_id;
        let hearing_task = task.parent.ok_or(Error::HearingAssociationMissing { task_id })?;
        let appeal = self
            .cases
            .get(appeal_id)
            .ok_or(Error::AppealNotFound(appeal_id))?;

        let mut created = Vec::new();
        if !appeal.is_legacy() {
            // The evidence window hangs off the hearing task's parent
            // so it survives this subtree. Reuse an open one if the
            // appeal already has it.
            let grandparent = self.tree.task(hearing_task)?.parent;
            let existing = grandparent.and_then(|parent| {
                self.tree
                    .open_children(parent)
                    .into_iter()
                    .find(|t| {
                        t.task_type == TaskType::EvidenceSubmissionWindow
                            && t.appeal_id == appeal_id
                    })
                    .map(|t| t.id)
            });
            let evidence = match existing {
                Some(id) => id,
                None => {
                    let mut spec = NewTask::new(
                        appeal_id,
                        TaskType::EvidenceSubmissionWindow,
                        Assignee::Organization(org::MAIL_TEAM.to_string()),
                    );
                    spec.parent = grandparent;
                    self.tree.create(spec)?
                }
            };
            created.push(evidence);
        }

        self.tree.set_status(task_id, TaskStatus::Cancelled, user)?;
        Ok(created)
    }

    fn no_show_inner(&mut self, task_id: TaskId) -> Result<Vec<TaskId>> {
        self.check_disposition(task_id, HearingDisposition::NoShow)?;
        let appeal_id = self.tree.task(task_id)?.appeal_id;

        let follow_up = self.tree.create(
            NewTask::new(
                appeal_id,
                TaskType::NoShowHearing,
                Assignee::Organization(org::HEARINGS_MANAGEMENT.to_string()),
            )
            .with_parent(task_id)
            .with_instruction(NO_SHOW_HOLD_INSTRUCTIONS),
        )?;
        self.tree.place_on_hold(follow_up, NO_SHOW_HOLD_DAYS)?;
        Ok(vec![follow_up])
    }

    fn postpone_inner(
        &mut self,
        task_id: TaskId,
        after: AfterDisposition,
        instructions: Option<String>,
    ) -> Result<Vec<TaskId>> {
        self.check_disposition(task_id, HearingDisposition::Postponed)?;
        match after {
            AfterDisposition::Reschedule { hearing_day_id } => {
                self.reschedule(task_id, hearing_day_id)
            }
            AfterDisposition::ScheduleLater { admin_action } => {
                self.schedule_later(task_id, instructions, admin_action)
            }
        }
    }

    fn reschedule(&mut self, task_id: TaskId, hearing_day_id: HearingDayId) -> Result<Vec<TaskId>> {
        let task = self.tree.task(task_id)?;
        let appeal_id = task.appeal_id;
        let hearing_task = task.parent.ok_or(Error::HearingAssociationMissing { task_id })?;

        let new_hearing_task = self.tree.cancel_and_recreate(hearing_task)?;
        let new_hearing = self.hearings.slot_new_hearing(hearing_day_id, appeal_id)?;
        let new_disposition =
            self.create_disposition_task(appeal_id, new_hearing_task, new_hearing)?;
        Ok(vec![new_hearing_task, new_disposition])
    }

    fn schedule_later(
        &mut self,
        task_id: TaskId,
        instructions: Option<String>,
        admin_action: Option<AdminActionSpec>,
    ) -> Result<Vec<TaskId>> {
        let task = self.tree.task(task_id)?;
        let appeal_id = task.appeal_id;
        let hearing_task = task.parent.ok_or(Error::HearingAssociationMissing { task_id })?;

        let new_hearing_task = self.tree.cancel_and_recreate(hearing_task)?;

        let mut schedule_spec = NewTask::new(
            appeal_id,
            TaskType::ScheduleHearing,
            Assignee::Organization(org::BOARD.to_string()),
        )
        .with_parent(new_hearing_task);
        if let Some(note) = instructions {
            schedule_spec = schedule_spec.with_instruction(note);
        }
        let schedule_task = self.tree.create(schedule_spec)?;

        let mut created = vec![new_hearing_task, schedule_task];
        if let Some(spec) = admin_action {
            let mut admin_spec = NewTask::new(
                appeal_id,
                TaskType::HearingAdminAction,
                Assignee::Organization(org::HEARINGS_MANAGEMENT.to_string()),
            )
            .with_parent(schedule_task);
            if let Some(note) = spec.instructions {
                admin_spec = admin_spec.with_instruction(note);
            }
            created.push(self.tree.create(admin_spec)?);
        }
        Ok(created)
    }

    /// The hearing behind a disposition task, via its hearing task.
    fn hearing_for(&self, task_id: TaskId) -> Result<&Hearing> {
        let task = self.tree.task(task_id)?;
        let hearing_task = task.parent.ok_or(Error::HearingAssociationMissing { task_id })?;
        self.hearings
            .hearing_for_task(hearing_task)
            .ok_or(Error::HearingAssociationMissing { task_id })
    }

    fn check_disposition(
        &self,
        task_id: TaskId,
        expected: HearingDisposition,
    ) -> Result<&Hearing> {
        let hearing = self.hearing_for(task_id)?;
        if hearing.disposition != Some(expected) {
            return Err(Error::DispositionMismatch {
                expected,
                actual: hearing.disposition,
            });
        }
        Ok(hearing)
    }

    fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let tree_snapshot = self.tree.clone();
        let hearings_snapshot = self.hearings.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                *self.tree = tree_snapshot;
                *self.hearings = hearings_snapshot;
                Err(error)
            }
        }
    }
}
