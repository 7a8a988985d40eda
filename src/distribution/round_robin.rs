//! Round-robin distributor.
//!
//! Rotates over a pool of users ordered by ascending id. The cursor is
//! an atomic counter: selection and advance are one read-modify-write,
//! so concurrent distribution calls cannot observe a lost update. The
//! counter grows monotonically; the pool index is the counter modulo
//! the pool length.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::audit::{AssignmentPath, AuditSink, TracingAuditSink};
use crate::error::{Error, Result};
use crate::models::UserId;

/// Rotating assignee selector over an ordered pool.
pub struct RoundRobinDistributor {
    name: String,
    pool: Vec<UserId>,
    cursor: AtomicUsize,
    sink: Arc<dyn AuditSink>,
}

impl RoundRobinDistributor {
    /// Creates a distributor over `pool`, ordered ascending by id.
    pub fn new(name: impl Into<String>, mut pool: Vec<UserId>) -> Self {
        pool.sort_unstable();
        pool.dedup();
        Self {
            name: name.into(),
            pool,
            cursor: AtomicUsize::new(0),
            sink: Arc::new(TracingAuditSink),
        }
    }

    /// Replaces the audit sink.
    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The ordered pool.
    pub fn pool(&self) -> &[UserId] {
        &self.pool
    }

    /// Selects the next assignee and advances the cursor.
    ///
    /// Fails with [`Error::EmptyAssigneePool`] if the pool is empty;
    /// the caller must not create a task with no assignee.
    pub fn next_assignee(&self) -> Result<UserId> {
        if self.pool.is_empty() {
            return Err(Error::EmptyAssigneePool);
        }

        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.pool.len();
        let assignee = self.pool[index];
        self.audit(assignee, AssignmentPath::RoundRobin);
        Ok(assignee)
    }

    pub(crate) fn audit(&self, assignee: UserId, path: AssignmentPath) {
        self.sink.assignment_decided(&self.name, assignee, path);
    }
}

impl fmt::Debug for RoundRobinDistributor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoundRobinDistributor")
            .field("name", &self.name)
            .field("pool", &self.pool)
            .field("cursor", &self.cursor.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::testing::RecordingSink;
    use std::collections::HashMap;
    use std::thread;

    #[test]
    fn test_empty_pool_is_a_configuration_error() {
        let distributor = RoundRobinDistributor::new("generic", vec![]);
        assert!(matches!(
            distributor.next_assignee(),
            Err(Error::EmptyAssigneePool)
        ));
    }

    #[test]
    fn test_pool_ordered_ascending_and_deduplicated() {
        let distributor = RoundRobinDistributor::new("generic", vec![30, 10, 20, 10]);
        assert_eq!(distributor.pool(), &[10, 20, 30]);
    }

    #[test]
    fn test_cycles_in_pool_order() {
        let distributor = RoundRobinDistributor::new("generic", vec![3, 1, 2]);
        let picks: Vec<UserId> = (0..7).map(|_| distributor.next_assignee().unwrap()).collect();
        assert_eq!(picks, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_fair_share_over_many_calls() {
        let distributor = RoundRobinDistributor::new("generic", vec![1, 2, 3]);
        let calls = 10;
        let mut counts: HashMap<UserId, usize> = HashMap::new();
        for _ in 0..calls {
            *counts.entry(distributor.next_assignee().unwrap()).or_default() += 1;
        }

        // Each member selected ceil(10/3) or floor(10/3) times.
        for member in [1, 2, 3] {
            let count = counts[&member];
            assert!(count == 3 || count == 4, "member {member} picked {count}x");
        }
    }

    #[test]
    fn test_concurrent_calls_lose_no_updates() {
        let distributor = Arc::new(RoundRobinDistributor::new("generic", vec![1, 2, 3, 4]));
        let threads = 4;
        let per_thread = 25;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let distributor = Arc::clone(&distributor);
                thread::spawn(move || {
                    (0..per_thread)
                        .map(|_| distributor.next_assignee().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut counts: HashMap<UserId, usize> = HashMap::new();
        for handle in handles {
            for pick in handle.join().unwrap() {
                *counts.entry(pick).or_default() += 1;
            }
        }

        // 100 selections over 4 members: exactly 25 each.
        for member in [1, 2, 3, 4] {
            assert_eq!(counts[&member], 25);
        }
    }

    #[test]
    fn test_audits_every_selection() {
        let sink = Arc::new(RecordingSink::default());
        let distributor =
            RoundRobinDistributor::new("generic", vec![1, 2]).with_audit_sink(sink.clone());

        distributor.next_assignee().unwrap();
        distributor.next_assignee().unwrap();

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ("generic".into(), 1, AssignmentPath::RoundRobin));
        assert_eq!(events[1], ("generic".into(), 2, AssignmentPath::RoundRobin));
    }
}
