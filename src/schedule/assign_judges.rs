//! Judge / hearing-day assignment.
//!
//! Assigns every still-unassigned central/video hearing day in a
//! schedule period to a judge, respecting each judge's unavailable
//! dates and existing commitments.
//!
//! # Algorithm
//!
//! 1. Build per-judge unavailable-date sets: explicit non-availability
//!    entries, plus every non-weekend day within 3 business days of a
//!    travel-board trip the judge is on.
//! 2. Collect the period's unassigned central/video days. Central days
//!    only sit on Wednesdays; a day pre-assigned to a judge is dropped
//!    and its date blocks that judge.
//! 3. Shuffle the day list once; the order then stays fixed.
//! 4. Sort judges descending by unavailable-date count — the most
//!    constrained judges pick first. Ties keep the judge map's
//!    iteration order (ascending login id), stable within a run.
//! 5. Sweep: each judge in sorted order scans the day list from the
//!    front for the first day neither taken nor unavailable, and takes
//!    it. Rounds repeat until every day is taken.
//! 6. A round that assigns nothing while days remain fails with
//!    [`Error::CannotAssignJudges`] — the configuration is infeasible.
//!
//! # Known limitation
//! The sweep is greedy and never backtracks a prior assignment, so it
//! can fail on feasible instances. This behavior is deliberate: runs
//! are audited, and reproducing the established order (including the
//! shuffle-then-fixed tie-break) matters more than optimality.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    HearingDay, HearingDayId, HearingRegistry, SchedulePeriod, StaffRecord, User,
};
use crate::schedule::blackout_window;

/// Business days blocked on each side of a travel-board trip.
const TRAVEL_BOARD_BLACKOUT_DAYS: u32 = 3;

/// A judge participating in an assignment run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeRecord {
    /// Staff record from the scheduling system of record.
    pub staff: StaffRecord,
    /// Live user record, when one exists.
    pub user: Option<User>,
    /// Dates the judge cannot sit.
    pub non_availability: BTreeSet<NaiveDate>,
}

impl JudgeRecord {
    /// Display name: the live user's full name, else a name composed
    /// from the staff record.
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) => user.full_name.clone(),
            None => self.staff.composed_name(),
        }
    }
}

/// One judge-to-hearing-day assignment produced by a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeAssignment {
    /// Assigned hearing day.
    pub hearing_day_id: HearingDayId,
    /// Date of the day.
    pub date: NaiveDate,
    /// Whether the day is a central (board) hearing day.
    pub central: bool,
    /// Hearing room, if allocated.
    pub room: Option<String>,
    /// Regional office; `None` for central days.
    pub regional_office: Option<String>,
    /// Assigned judge's board-member id.
    pub judge_id: String,
    /// Assigned judge's display name.
    pub judge_name: String,
}

/// Matches judges to a period's unassigned hearing days.
///
/// Construction snapshots the period's state; the matching run itself
/// touches no shared store. [`JudgeAssigner::commit`] writes the
/// results back.
#[derive(Debug, Clone)]
pub struct JudgeAssigner {
    judges: BTreeMap<String, JudgeRecord>,
    days: Vec<HearingDay>,
}

impl JudgeAssigner {
    /// Builds an assigner for a schedule period.
    ///
    /// Fails with [`Error::NoJudgesProvided`] if the period carries no
    /// usable judge non-availability records, and with
    /// [`Error::HearingDaysNotAllocated`] if no unassigned central or
    /// video hearing days exist — days must be allocated by an earlier
    /// step.
    pub fn new(
        period: &SchedulePeriod,
        staff: &[StaffRecord],
        users: &[User],
        registry: &HearingRegistry,
    ) -> Result<Self> {
        let mut judges = fetch_judge_non_availabilities(period);
        if judges.is_empty() {
            return Err(Error::NoJudgesProvided);
        }

        let mut records = BTreeMap::new();
        for (css_id, non_availability) in judges.iter_mut() {
            let Some(staff) = staff.iter().find(|s| &s.css_id == css_id) else {
                tracing::warn!(%css_id, "no staff record for judge; skipping");
                continue;
            };
            let user = users.iter().find(|u| &u.css_id == css_id).cloned();
            records.insert(
                css_id.clone(),
                JudgeRecord {
                    staff: staff.clone(),
                    user,
                    non_availability: std::mem::take(non_availability),
                },
            );
        }
        if records.is_empty() {
            return Err(Error::NoJudgesProvided);
        }

        let (period_days, trips) = registry.load_days(period.start_date, period.end_date);

        let mut days = Vec::new();
        for day in period_days {
            if let Some(assigned_judge) = &day.judge_id {
                // A pre-assigned day is off the table, and its judge is
                // booked on that date.
                for record in records.values_mut() {
                    if &record.staff.judge_id == assigned_judge {
                        record.non_availability.insert(day.date);
                    }
                }
                continue;
            }
            if day.is_central() && day.date.weekday() != Weekday::Wed {
                continue;
            }
            days.push(day.clone());
        }
        if days.is_empty() {
            return Err(Error::HearingDaysNotAllocated);
        }

        for trip in trips {
            let window = blackout_window(trip.start_date, trip.end_date, TRAVEL_BOARD_BLACKOUT_DAYS);
            for record in records.values_mut() {
                if trip.member_ids.contains(&record.staff.judge_id) {
                    record.non_availability.extend(window.iter().copied());
                }
            }
        }

        Ok(Self {
            judges: records,
            days,
        })
    }

    /// The participating judges, keyed by login id.
    pub fn judges(&self) -> &BTreeMap<String, JudgeRecord> {
        &self.judges
    }

    /// The unassigned hearing days under consideration.
    pub fn days(&self) -> &[HearingDay] {
        &self.days
    }

    /// Runs the matching sweep. See the module docs for the procedure.
    ///
    /// The caller supplies the RNG so audited runs can be reproduced.
    pub fn match_hearing_days_to_judges<R: Rng>(&self, rng: &mut R) -> Result<Vec<JudgeAssignment>> {
        let mut days: Vec<&HearingDay> = self.days.iter().collect();
        days.shuffle(rng);

        let mut sorted_judges: Vec<(&String, &JudgeRecord)> = self.judges.iter().collect();
        sorted_judges.sort_by_key(|(_, record)| std::cmp::Reverse(record.non_availability.len()));

        let mut taken: HashSet<HearingDayId> = HashSet::new();
        let mut assignments = Vec::new();

        loop {
            let assigned_before = assignments.len();

            for (_, record) in &sorted_judges {
                if assignments.len() == days.len() {
                    break;
                }
                for day in &days {
                    if taken.contains(&day.id) || record.non_availability.contains(&day.date) {
                        continue;
                    }
                    assignments.push(assignment_for(day, record));
                    taken.insert(day.id);
                    break;
                }
            }

            if assignments.len() == days.len() {
                tracing::info!(count = assignments.len(), "hearing days matched to judges");
                return Ok(assignments);
            }
            if assignments.len() == assigned_before {
                return Err(Error::CannotAssignJudges {
                    unassigned: days.len() - assignments.len(),
                });
            }
        }
    }

    /// Writes a run's assignments back to the hearing-day store.
    ///
    /// A day taken meanwhile by another run is overwritten and logged
    /// (last-writer risk, accepted).
    pub fn commit(assignments: &[JudgeAssignment], registry: &mut HearingRegistry) -> Result<()> {
        for assignment in assignments {
            registry.assign_judge_to_day(assignment.hearing_day_id, &assignment.judge_id)?;
        }
        Ok(())
    }
}

fn assignment_for(day: &HearingDay, record: &JudgeRecord) -> JudgeAssignment {
    JudgeAssignment {
        hearing_day_id: day.id,
        date: day.date,
        central: day.is_central(),
        room: day.room.clone(),
        regional_office: day.regional_office.clone(),
        judge_id: record.staff.judge_id.clone(),
        judge_name: record.display_name(),
    }
}

fn fetch_judge_non_availabilities(period: &SchedulePeriod) -> BTreeMap<String, BTreeSet<NaiveDate>> {
    let mut judges: BTreeMap<String, BTreeSet<NaiveDate>> = BTreeMap::new();
    for entry in &period.non_availability {
        judges
            .entry(entry.judge_css_id.clone())
            .or_default()
            .insert(entry.date);
    }
    judges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TravelBoardTrip;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period() -> SchedulePeriod {
        SchedulePeriod::new(date(2023, 6, 1), date(2023, 6, 30))
    }

    fn staff(css_id: &str, judge_id: &str) -> StaffRecord {
        StaffRecord::new(css_id, judge_id, "First", "Last")
    }

    fn registry_with_video_days(dates: &[NaiveDate]) -> HearingRegistry {
        let mut registry = HearingRegistry::new();
        for (i, d) in dates.iter().enumerate() {
            registry.add_day(HearingDay::video(i as u64 + 1, *d, "RO17"));
        }
        registry
    }

    #[test]
    fn test_no_judges_is_a_configuration_error() {
        let registry = registry_with_video_days(&[date(2023, 6, 5)]);
        let result = JudgeAssigner::new(&period(), &[staff("J1", "101")], &[], &registry);
        assert!(matches!(result, Err(Error::NoJudgesProvided)));
    }

    #[test]
    fn test_unallocated_days_is_a_configuration_error() {
        // Days exist but every one is pre-assigned: not a silent no-op.
        let mut registry = HearingRegistry::new();
        registry.add_day(HearingDay::video(1, date(2023, 6, 5), "RO17").with_judge("101"));

        let p = period().with_non_availability("J1", date(2023, 6, 9));
        let result = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry);
        assert!(matches!(result, Err(Error::HearingDaysNotAllocated)));
    }

    #[test]
    fn test_every_day_assigned_once_and_off_blocked_dates() {
        let dates = [
            date(2023, 6, 5),
            date(2023, 6, 6),
            date(2023, 6, 8),
            date(2023, 6, 9),
        ];
        let registry = registry_with_video_days(&dates);
        let p = period()
            .with_non_availability("J1", date(2023, 6, 5))
            .with_non_availability("J1", date(2023, 6, 6))
            .with_non_availability("J2", date(2023, 6, 8));
        let assigner = JudgeAssigner::new(
            &p,
            &[staff("J1", "101"), staff("J2", "102")],
            &[],
            &registry,
        )
        .unwrap();

        for seed in 0..8 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let assignments = assigner.match_hearing_days_to_judges(&mut rng).unwrap();

            assert_eq!(assignments.len(), dates.len());
            let mut seen: Vec<HearingDayId> =
                assignments.iter().map(|a| a.hearing_day_id).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), dates.len(), "a day was assigned twice");

            for a in &assignments {
                let judge = assigner
                    .judges()
                    .values()
                    .find(|r| r.staff.judge_id == a.judge_id)
                    .unwrap();
                assert!(
                    !judge.non_availability.contains(&a.date),
                    "judge {} assigned on blocked date {}",
                    a.judge_id,
                    a.date
                );
            }
        }
    }

    #[test]
    fn test_most_constrained_judge_picks_first() {
        // One day both judges could take: it must go to the judge with
        // more blocked dates.
        let registry = registry_with_video_days(&[date(2023, 6, 9)]);
        let p = period()
            .with_non_availability("J1", date(2023, 6, 5))
            .with_non_availability("J2", date(2023, 6, 5))
            .with_non_availability("J2", date(2023, 6, 6));
        let assigner = JudgeAssigner::new(
            &p,
            &[staff("J1", "101"), staff("J2", "102")],
            &[],
            &registry,
        )
        .unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let assignments = assigner.match_hearing_days_to_judges(&mut rng).unwrap();
        assert_eq!(assignments[0].judge_id, "102");
    }

    #[test]
    fn test_infeasible_configuration_fails_with_remaining_count() {
        // One judge, two days, one of them blocked: the second round
        // assigns nothing and a day remains.
        let registry = registry_with_video_days(&[date(2023, 6, 5), date(2023, 6, 6)]);
        let p = period().with_non_availability("J1", date(2023, 6, 6));
        let assigner = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let result = assigner.match_hearing_days_to_judges(&mut rng);
        assert!(matches!(
            result,
            Err(Error::CannotAssignJudges { unassigned: 1 })
        ));
    }

    #[test]
    fn test_one_judge_can_sweep_all_days() {
        let dates = [date(2023, 6, 5), date(2023, 6, 6), date(2023, 6, 8)];
        let registry = registry_with_video_days(&dates);
        let p = period().with_non_availability("J1", date(2023, 6, 1));
        let assigner = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry).unwrap();

        let mut rng = SmallRng::seed_from_u64(3);
        let assignments = assigner.match_hearing_days_to_judges(&mut rng).unwrap();
        assert_eq!(assignments.len(), 3);
        assert!(assignments.iter().all(|a| a.judge_id == "101"));
    }

    #[test]
    fn test_central_days_only_sit_on_wednesdays() {
        let mut registry = HearingRegistry::new();
        registry.add_day(HearingDay::central(1, date(2023, 6, 7))); // Wednesday
        registry.add_day(HearingDay::central(2, date(2023, 6, 8))); // Thursday
        registry.add_day(HearingDay::video(3, date(2023, 6, 8), "RO17"));

        let p = period().with_non_availability("J1", date(2023, 6, 1));
        let assigner = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry).unwrap();

        let ids: Vec<HearingDayId> = assigner.days().iter().map(|d| d.id).collect();
        assert!(ids.contains(&1));
        assert!(!ids.contains(&2));
        assert!(ids.contains(&3));

        let mut rng = SmallRng::seed_from_u64(0);
        let assignments = assigner.match_hearing_days_to_judges(&mut rng).unwrap();
        let central = assignments.iter().find(|a| a.hearing_day_id == 1).unwrap();
        assert!(central.central);
        assert_eq!(central.regional_office, None);
    }

    #[test]
    fn test_preassigned_day_blocks_its_judge() {
        let mut registry = HearingRegistry::new();
        registry.add_day(HearingDay::video(1, date(2023, 6, 5), "RO17").with_judge("101"));
        registry.add_day(HearingDay::video(2, date(2023, 6, 5), "RO44"));

        let p = period().with_non_availability("J1", date(2023, 6, 1));
        let assigner = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry).unwrap();

        // The pre-assigned day's date now blocks judge 101, and only
        // day 2 is considered — which 101 can no longer take.
        assert_eq!(assigner.days().len(), 1);
        let judge = &assigner.judges()["J1"];
        assert!(judge.non_availability.contains(&date(2023, 6, 5)));

        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(
            assigner.match_hearing_days_to_judges(&mut rng),
            Err(Error::CannotAssignJudges { unassigned: 1 })
        ));
    }

    #[test]
    fn test_travel_board_blackout_blocks_padded_window() {
        let mut registry = registry_with_video_days(&[date(2023, 6, 26)]);
        registry.add_trip(TravelBoardTrip {
            start_date: date(2023, 6, 12),
            end_date: date(2023, 6, 16),
            member_ids: vec!["101".into()],
        });

        let p = period().with_non_availability("J1", date(2023, 6, 1));
        let assigner = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry).unwrap();

        let judge = &assigner.judges()["J1"];
        // 3 business days before the trip through 3 after, no weekends.
        assert!(judge.non_availability.contains(&date(2023, 6, 7)));
        assert!(judge.non_availability.contains(&date(2023, 6, 14)));
        assert!(judge.non_availability.contains(&date(2023, 6, 21)));
        assert!(!judge.non_availability.contains(&date(2023, 6, 10)));
        assert!(!judge.non_availability.contains(&date(2023, 6, 22)));
    }

    #[test]
    fn test_judge_name_prefers_live_user_record() {
        let registry = registry_with_video_days(&[date(2023, 6, 5), date(2023, 6, 6)]);
        let p = period()
            .with_non_availability("J1", date(2023, 6, 1))
            .with_non_availability("J2", date(2023, 6, 1));
        let users = vec![User::new(1, "J1").with_full_name("Live Name")];
        let staff_records = [
            staff("J1", "101"),
            StaffRecord::new("J2", "102", "Sol", "Brody").with_middle_initial("B"),
        ];
        let assigner = JudgeAssigner::new(&p, &staff_records, &users, &registry).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let assignments = assigner.match_hearing_days_to_judges(&mut rng).unwrap();

        let by_judge = |id: &str| {
            assignments
                .iter()
                .find(|a| a.judge_id == id)
                .map(|a| a.judge_name.clone())
        };
        assert_eq!(by_judge("101"), Some("Live Name".into()));
        assert_eq!(by_judge("102"), Some("Sol B Brody".into()));
    }

    #[test]
    fn test_commit_writes_judges_onto_days() {
        let mut registry = registry_with_video_days(&[date(2023, 6, 5)]);
        let p = period().with_non_availability("J1", date(2023, 6, 1));
        let assigner = JudgeAssigner::new(&p, &[staff("J1", "101")], &[], &registry).unwrap();

        let mut rng = SmallRng::seed_from_u64(0);
        let assignments = assigner.match_hearing_days_to_judges(&mut rng).unwrap();
        JudgeAssigner::commit(&assignments, &mut registry).unwrap();

        assert_eq!(registry.day(1).unwrap().judge_id.as_deref(), Some("101"));
    }
}
