//! Proportion arithmetic over dockets.
//!
//! A [`ProportionMap`] is a snapshot mapping each docket to a fraction
//! of decision capacity. Maps are built from raw case-count weights,
//! normalized to sum to 1, and adjusted by pinning individual dockets
//! to fixed shares while the rest renormalize around them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::DocketKind;

/// Docket-to-fraction snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionMap(BTreeMap<DocketKind, f64>);

impl ProportionMap {
    /// Builds a normalized map from raw weights.
    ///
    /// An all-zero weight set normalizes to an even split — degenerate
    /// inventories must not divide by zero.
    pub fn normalized(weights: BTreeMap<DocketKind, f64>) -> Self {
        let mut map = Self(weights);
        map.normalize(1.0);
        map
    }

    /// The fraction for a docket (0 if absent).
    pub fn get(&self, docket: DocketKind) -> f64 {
        self.0.get(&docket).copied().unwrap_or(0.0)
    }

    /// Iterates entries in docket order.
    pub fn iter(&self) -> impl Iterator<Item = (DocketKind, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Sum of all fractions.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Scales all entries so they sum to `to`.
    fn normalize(&mut self, to: f64) {
        let total = self.total();
        if total == 0.0 {
            let count = self.0.len();
            if count > 0 {
                let share = to / count as f64;
                for value in self.0.values_mut() {
                    *value = share;
                }
            }
            return;
        }
        let factor = to / total;
        for value in self.0.values_mut() {
            *value *= factor;
        }
    }

    /// Pins the given dockets to fixed fractions and renormalizes the
    /// remaining dockets into the leftover share.
    pub fn pin(&mut self, fixed: &[(DocketKind, f64)]) {
        let fixed_total: f64 = fixed.iter().map(|(_, v)| v).sum();
        let mut rest = Self(
            self.0
                .iter()
                .filter(|(k, _)| !fixed.iter().any(|(fk, _)| fk == *k))
                .map(|(k, v)| (*k, *v))
                .collect(),
        );
        rest.normalize(1.0 - fixed_total);

        self.0 = rest.0;
        for (docket, value) in fixed {
            self.0.insert(*docket, *value);
        }
    }

    /// Folds floating-point residue into the largest bucket so the
    /// fractions account for the whole.
    pub fn reconcile(&mut self) {
        let Some(largest) = self
            .0
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(k, _)| *k)
        else {
            return;
        };
        let others: f64 = self
            .0
            .iter()
            .filter(|(k, _)| **k != largest)
            .map(|(_, v)| v)
            .sum();
        self.0.insert(largest, 1.0 - others);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn weights(legacy: f64, direct: f64, evidence: f64, hearing: f64) -> BTreeMap<DocketKind, f64> {
        BTreeMap::from([
            (DocketKind::Legacy, legacy),
            (DocketKind::DirectReview, direct),
            (DocketKind::EvidenceSubmission, evidence),
            (DocketKind::Hearing, hearing),
        ])
    }

    #[test]
    fn test_normalized_sums_to_one() {
        let map = ProportionMap::normalized(weights(10.0, 20.0, 5.0, 5.0));
        assert!(close(map.total(), 1.0));
        assert!(close(map.get(DocketKind::DirectReview), 0.5));
        assert!(close(map.get(DocketKind::Legacy), 0.25));
    }

    #[test]
    fn test_all_zero_weights_split_evenly() {
        let map = ProportionMap::normalized(weights(0.0, 0.0, 0.0, 0.0));
        assert!(close(map.total(), 1.0));
        for docket in DocketKind::ALL {
            assert!(close(map.get(docket), 0.25));
        }
    }

    #[test]
    fn test_pin_renormalizes_the_rest() {
        let mut map = ProportionMap::normalized(weights(10.0, 20.0, 5.0, 5.0));
        map.pin(&[(DocketKind::DirectReview, 0.2)]);

        assert!(close(map.get(DocketKind::DirectReview), 0.2));
        assert!(close(map.get(DocketKind::Legacy), 0.4));
        assert!(close(map.get(DocketKind::EvidenceSubmission), 0.2));
        assert!(close(map.get(DocketKind::Hearing), 0.2));
        assert!(close(map.total(), 1.0));
    }

    #[test]
    fn test_pin_two_dockets() {
        let mut map = ProportionMap::normalized(weights(12.0, 70.0, 12.0, 12.0));
        map.pin(&[(DocketKind::DirectReview, 0.8)]);
        map.pin(&[(DocketKind::Legacy, 0.1), (DocketKind::DirectReview, 0.8)]);

        assert!(close(map.get(DocketKind::Legacy), 0.1));
        assert!(close(map.get(DocketKind::DirectReview), 0.8));
        assert!(close(map.get(DocketKind::EvidenceSubmission), 0.05));
        assert!(close(map.get(DocketKind::Hearing), 0.05));
    }

    #[test]
    fn test_pin_with_zero_weight_rest_splits_evenly() {
        let mut map = ProportionMap::normalized(weights(0.0, 10.0, 0.0, 0.0));
        map.pin(&[(DocketKind::DirectReview, 0.8)]);

        assert!(close(map.get(DocketKind::DirectReview), 0.8));
        // The three zero-weight dockets split the remaining 0.2.
        for docket in [
            DocketKind::Legacy,
            DocketKind::EvidenceSubmission,
            DocketKind::Hearing,
        ] {
            assert!(close(map.get(docket), 0.2 / 3.0));
        }
    }

    #[test]
    fn test_reconcile_folds_residue_into_largest() {
        let mut map = ProportionMap(weights(0.4, 0.2, 0.2, 0.2 - 1e-12));
        map.reconcile();
        assert!((map.total() - 1.0).abs() < 1e-15);
        assert!(close(map.get(DocketKind::Legacy), 0.4));
    }
}
