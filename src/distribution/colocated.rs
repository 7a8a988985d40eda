//! Colocated distributor: round robin with case affinity.
//!
//! The colocated pool is the non-admin membership of the colocated
//! organization, ordered by ascending id. If the case already has an
//! open task assigned to a pool member, that member is returned
//! without advancing the cursor — the same handler keeps the case.
//! Otherwise selection falls through to the round-robin rotation.

use std::sync::Arc;

use crate::audit::{AssignmentPath, AuditSink};
use crate::error::Result;
use crate::models::{org, AppealId, Directory, TaskTree, UserId};

use super::RoundRobinDistributor;

/// Affinity-aware distributor for the colocated pool.
#[derive(Debug)]
pub struct ColocatedDistributor {
    inner: RoundRobinDistributor,
}

impl ColocatedDistributor {
    /// Creates a distributor over an explicit pool.
    pub fn new(pool: Vec<UserId>) -> Self {
        Self {
            inner: RoundRobinDistributor::new("colocated", pool),
        }
    }

    /// Creates a distributor over the colocated organization's
    /// non-admin members.
    pub fn from_directory(directory: &Directory) -> Self {
        let pool = directory
            .organization(org::COLOCATED)
            .map(|organization| organization.non_admins())
            .unwrap_or_default();
        Self::new(pool)
    }

    /// Replaces the audit sink.
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.inner = self.inner.with_audit_sink(sink);
        self
    }

    /// The ordered pool.
    pub fn pool(&self) -> &[UserId] {
        self.inner.pool()
    }

    /// Selects the next assignee, preferring the pool member already
    /// holding an open task on the appeal.
    pub fn next_assignee(&self, tree: &TaskTree, appeal: Option<AppealId>) -> Result<UserId> {
        if let Some(appeal_id) = appeal {
            if let Some(existing) = tree.open_task_assigned_to(appeal_id, self.inner.pool()) {
                self.inner.audit(existing, AssignmentPath::Affinity);
                return Ok(existing);
            }
        }
        self.inner.next_assignee()
    }
}
