//! Bulk task assignment.
//!
//! Hands a batch of an organization's queued tasks to one user by
//! creating a child task per selection. Requests are validated field
//! by field before anything is created, and all creations happen in
//! one tree transaction.
//!
//! # Ordering
//! Tasks are taken oldest first, with priority cases promoted:
//! advanced-on-docket outranks court-remanded outranks everything
//! else, and creation order breaks ties within each class.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    AppealId, Assignee, CaseRegistry, Directory, NewTask, TaskId, TaskTree, TaskType, UserId,
};
use crate::validation::ValidationProblem;

/// A validated batch-assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkTaskAssignment {
    /// Organization whose queue is drained.
    pub organization: String,
    /// Task type to pull from the queue.
    pub task_type: TaskType,
    /// User receiving the work.
    pub assigned_to: UserId,
    /// Admin performing the assignment.
    pub assigned_by: UserId,
    /// Restrict to appeals closest to this regional office.
    pub regional_office: Option<String>,
    /// Maximum number of tasks to assign.
    pub task_count: usize,
}

impl BulkTaskAssignment {
    /// Creates a request.
    pub fn new(
        organization: impl Into<String>,
        task_type: TaskType,
        assigned_to: UserId,
        assigned_by: UserId,
    ) -> Self {
        Self {
            organization: organization.into(),
            task_type,
            assigned_to,
            assigned_by,
            regional_office: None,
            task_count: 0,
        }
    }

    /// Restricts the batch to one regional office.
    pub fn with_regional_office(mut self, key: impl Into<String>) -> Self {
        self.regional_office = Some(key.into());
        self
    }

    /// Sets the batch size.
    pub fn with_task_count(mut self, count: usize) -> Self {
        self.task_count = count;
        self
    }

    /// Checks the request against the directory.
    ///
    /// Returns every detected problem, not just the first.
    pub fn validate(&self, directory: &Directory) -> Vec<ValidationProblem> {
        let mut problems = Vec::new();

        let organization = directory.organization(&self.organization);
        if organization.is_none() {
            problems.push(ValidationProblem::new(
                "organization",
                format!("could not find an organization named {}", self.organization),
            ));
        }

        if directory.user(self.assigned_to).is_none() {
            problems.push(ValidationProblem::new(
                "assigned_to",
                format!("could not find a user with id {}", self.assigned_to),
            ));
        }

        if let Some(key) = &self.regional_office {
            if !directory.has_regional_office(key) {
                problems.push(ValidationProblem::new(
                    "regional_office",
                    format!("could not find regional office: {key}"),
                ));
            }
        }

        if let Some(organization) = organization {
            if !organization.is_member(self.assigned_to) {
                problems.push(ValidationProblem::new(
                    "assigned_to",
                    format!("does not belong to organization {}", self.organization),
                ));
            }
            if !organization.is_admin(self.assigned_by) {
                problems.push(ValidationProblem::new(
                    "assigned_by",
                    format!("is not an admin of organization {}", self.organization),
                ));
            }
        }

        problems
    }

    /// Validates, selects, and assigns the batch.
    ///
    /// Returns the created child task ids, oldest selection first.
    pub fn process(
        &self,
        tree: &mut TaskTree,
        cases: &CaseRegistry,
        directory: &Directory,
    ) -> Result<Vec<TaskId>> {
        let problems = self.validate(directory);
        if !problems.is_empty() {
            return Err(Error::Invalid(problems));
        }

        let selected = self.tasks_to_be_assigned(tree, cases);

        tree.transaction(|tree| {
            selected
                .iter()
                .map(|&(task_id, appeal_id)| {
                    tree.create(
                        NewTask::new(appeal_id, self.task_type, Assignee::User(self.assigned_to))
                            .with_parent(task_id)
                            .with_assigned_by(self.assigned_by),
                    )
                })
                .collect()
        })
    }

    /// Queue selection: active tasks of the requested type, filtered
    /// by regional office, promoted by case priority, capped at
    /// `task_count`.
    fn tasks_to_be_assigned(&self, tree: &TaskTree, cases: &CaseRegistry) -> Vec<(TaskId, AppealId)> {
        let queue: Vec<_> = tree
            .active_organization_tasks(self.task_type, &self.organization)
            .into_iter()
            .filter(|task| match &self.regional_office {
                None => true,
                Some(key) => cases
                    .get(task.appeal_id)
                    .and_then(|appeal| appeal.regional_office.as_deref())
                    == Some(key.as_str()),
            })
            .collect();

        let count = queue.len();
        let mut weighted: Vec<_> = queue
            .into_iter()
            .enumerate()
            .map(|(index, task)| {
                let mut weight = count - index;
                if let Some(appeal) = cases.get(task.appeal_id) {
                    if appeal.aod {
                        weight += count.pow(3);
                    }
                    if appeal.cavc {
                        weight += count.pow(2);
                    }
                }
                (task.id, task.appeal_id, weight)
            })
            .collect();

        weighted.sort_by_key(|&(_, _, weight)| std::cmp::Reverse(weight));
        weighted
            .into_iter()
            .take(self.task_count)
            .map(|(task_id, appeal_id, _)| (task_id, appeal_id))
            .collect()
    }
}
