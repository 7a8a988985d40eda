//! Hearings, hearing days, and schedule periods.
//!
//! A hearing day is a schedulable slot (date, room, regional office)
//! that may be pre-assigned to a judge. A hearing occupies a slot for
//! one appeal and eventually records a disposition. Travel-board
//! commitments are separate trip records whose member judges become
//! unavailable around the trip dates.
//!
//! Central (board) days carry no regional office; a day with a
//! regional office is a video day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

use super::{AppealId, HearingDayId, HearingId, TaskId};

/// Outcome recorded for a hearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HearingDisposition {
    /// The hearing took place.
    Held,
    /// The appellant withdrew the hearing request.
    Cancelled,
    /// The hearing was moved to a later slot.
    Postponed,
    /// The appellant did not appear.
    NoShow,
}

/// A scheduled (or held) hearing for an appeal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hearing {
    /// Unique hearing identifier.
    pub id: HearingId,
    /// Appeal being heard.
    pub appeal_id: AppealId,
    /// Slot the hearing occupies.
    pub hearing_day_id: HearingDayId,
    /// Recorded outcome, once known.
    pub disposition: Option<HearingDisposition>,
    /// Whether the appellant waived the post-hearing evidence window.
    pub evidence_window_waived: bool,
}

/// A schedulable hearing slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HearingDay {
    /// Unique hearing-day identifier.
    pub id: HearingDayId,
    /// Calendar date of the slot.
    pub date: NaiveDate,
    /// Hearing room, if allocated.
    pub room: Option<String>,
    /// Regional office key. `None` marks a central (board) day.
    pub regional_office: Option<String>,
    /// Board-member id of the pre-assigned judge, if any.
    pub judge_id: Option<String>,
}

impl HearingDay {
    /// Creates a central hearing day.
    pub fn central(id: HearingDayId, date: NaiveDate) -> Self {
        Self {
            id,
            date,
            room: None,
            regional_office: None,
            judge_id: None,
        }
    }

    /// Creates a video hearing day at a regional office.
    pub fn video(id: HearingDayId, date: NaiveDate, regional_office: impl Into<String>) -> Self {
        Self {
            id,
            date,
            room: None,
            regional_office: Some(regional_office.into()),
            judge_id: None,
        }
    }

    /// Sets the room.
    pub fn with_room(mut self, room: impl Into<String>) -> Self {
        self.room = Some(room.into());
        self
    }

    /// Pre-assigns a judge by board-member id.
    pub fn with_judge(mut self, judge_id: impl Into<String>) -> Self {
        self.judge_id = Some(judge_id.into());
        self
    }

    /// Central days have no regional office marker.
    pub fn is_central(&self) -> bool {
        self.regional_office.is_none()
    }
}

/// A travel-board commitment blocking its member judges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelBoardTrip {
    /// First day of the trip.
    pub start_date: NaiveDate,
    /// Last day of the trip.
    pub end_date: NaiveDate,
    /// Board-member ids of the judges on the trip.
    pub member_ids: Vec<String>,
}

/// An explicit date a judge cannot sit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonAvailability {
    /// Judge login identifier.
    pub judge_css_id: String,
    /// Blocked date.
    pub date: NaiveDate,
}

/// A scheduling period with its judge non-availability entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePeriod {
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Explicit non-availability entries for the period.
    pub non_availability: Vec<NonAvailability>,
}

impl SchedulePeriod {
    /// Creates a period with no entries.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            non_availability: Vec::new(),
        }
    }

    /// Adds a non-availability entry.
    pub fn with_non_availability(mut self, judge_css_id: impl Into<String>, date: NaiveDate) -> Self {
        self.non_availability.push(NonAvailability {
            judge_css_id: judge_css_id.into(),
            date,
        });
        self
    }
}

/// Store of hearings, hearing days, travel-board trips, and the
/// hearing-task associations the disposition workflow navigates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HearingRegistry {
    hearings: BTreeMap<HearingId, Hearing>,
    days: BTreeMap<HearingDayId, HearingDay>,
    trips: Vec<TravelBoardTrip>,
    associations: BTreeMap<TaskId, HearingId>,
    next_hearing_id: HearingId,
}

impl HearingRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            next_hearing_id: 1,
            ..Self::default()
        }
    }

    /// Adds a hearing day.
    pub fn add_day(&mut self, day: HearingDay) {
        self.days.insert(day.id, day);
    }

    /// Adds a travel-board trip.
    pub fn add_trip(&mut self, trip: TravelBoardTrip) {
        self.trips.push(trip);
    }

    /// Looks up a hearing.
    pub fn hearing(&self, id: HearingId) -> Result<&Hearing> {
        self.hearings.get(&id).ok_or(Error::HearingNotFound(id))
    }

    /// Looks up a hearing day.
    pub fn day(&self, id: HearingDayId) -> Result<&HearingDay> {
        self.days.get(&id).ok_or(Error::HearingDayNotFound(id))
    }

    /// Central/video hearing days within `[start, end]`, plus the
    /// travel-board trips overlapping the range.
    pub fn load_days(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> (Vec<&HearingDay>, Vec<&TravelBoardTrip>) {
        let days = self
            .days
            .values()
            .filter(|d| d.date >= start && d.date <= end)
            .collect();
        let trips = self
            .trips
            .iter()
            .filter(|t| t.start_date <= end && t.end_date >= start)
            .collect();
        (days, trips)
    }

    /// Creates a hearing occupying a slot.
    pub fn slot_new_hearing(
        &mut self,
        hearing_day_id: HearingDayId,
        appeal_id: AppealId,
    ) -> Result<HearingId> {
        self.day(hearing_day_id)?;
        let id = self.next_hearing_id;
        self.next_hearing_id += 1;
        self.hearings.insert(
            id,
            Hearing {
                id,
                appeal_id,
                hearing_day_id,
                disposition: None,
                evidence_window_waived: false,
            },
        );
        Ok(id)
    }

    /// Records a hearing's disposition.
    pub fn set_disposition(&mut self, id: HearingId, disposition: HearingDisposition) -> Result<()> {
        let hearing = self
            .hearings
            .get_mut(&id)
            .ok_or(Error::HearingNotFound(id))?;
        hearing.disposition = Some(disposition);
        Ok(())
    }

    /// Marks a hearing's evidence window as waived.
    pub fn waive_evidence_window(&mut self, id: HearingId) -> Result<()> {
        let hearing = self
            .hearings
            .get_mut(&id)
            .ok_or(Error::HearingNotFound(id))?;
        hearing.evidence_window_waived = true;
        Ok(())
    }

    /// Associates a hearing task with its hearing.
    pub fn associate(&mut self, hearing_task_id: TaskId, hearing_id: HearingId) -> Result<()> {
        self.hearing(hearing_id)?;
        self.associations.insert(hearing_task_id, hearing_id);
        Ok(())
    }

    /// The hearing associated with a hearing task, if any.
    pub fn hearing_for_task(&self, hearing_task_id: TaskId) -> Option<&Hearing> {
        self.associations
            .get(&hearing_task_id)
            .and_then(|id| self.hearings.get(id))
    }

    /// Writes a judge assignment onto a day.
    ///
    /// A day assigned meanwhile by another run is overwritten
    /// (last-writer); the conflict is logged for the audit trail.
    pub fn assign_judge_to_day(&mut self, day_id: HearingDayId, judge_id: &str) -> Result<()> {
        let day = self
            .days
            .get_mut(&day_id)
            .ok_or(Error::HearingDayNotFound(day_id))?;
        if let Some(existing) = &day.judge_id {
            if existing != judge_id {
                tracing::warn!(day = day_id, %existing, judge_id, "overwriting judge assignment");
            }
        }
        day.judge_id = Some(judge_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_central_has_no_region_marker() {
        let central = HearingDay::central(1, date(2023, 6, 7));
        assert!(central.is_central());

        let video = HearingDay::video(2, date(2023, 6, 8), "RO17").with_room("1A");
        assert!(!video.is_central());
        assert_eq!(video.room.as_deref(), Some("1A"));
    }

    #[test]
    fn test_load_days_filters_range() {
        let mut registry = HearingRegistry::new();
        registry.add_day(HearingDay::video(1, date(2023, 6, 1), "RO17"));
        registry.add_day(HearingDay::video(2, date(2023, 7, 1), "RO17"));
        registry.add_trip(TravelBoardTrip {
            start_date: date(2023, 5, 29),
            end_date: date(2023, 6, 2),
            member_ids: vec!["101".into()],
        });
        registry.add_trip(TravelBoardTrip {
            start_date: date(2023, 8, 1),
            end_date: date(2023, 8, 5),
            member_ids: vec!["102".into()],
        });

        let (days, trips) = registry.load_days(date(2023, 6, 1), date(2023, 6, 30));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].id, 1);
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].member_ids, vec!["101".to_string()]);
    }

    #[test]
    fn test_slot_new_hearing_requires_day() {
        let mut registry = HearingRegistry::new();
        assert!(matches!(
            registry.slot_new_hearing(9, 1),
            Err(Error::HearingDayNotFound(9))
        ));

        registry.add_day(HearingDay::central(9, date(2023, 6, 7)));
        let hearing_id = registry.slot_new_hearing(9, 1).unwrap();
        let hearing = registry.hearing(hearing_id).unwrap();
        assert_eq!(hearing.appeal_id, 1);
        assert_eq!(hearing.disposition, None);
    }

    #[test]
    fn test_association_round_trip() {
        let mut registry = HearingRegistry::new();
        registry.add_day(HearingDay::central(1, date(2023, 6, 7)));
        let hearing_id = registry.slot_new_hearing(1, 1).unwrap();

        registry.associate(10, hearing_id).unwrap();
        assert_eq!(registry.hearing_for_task(10).map(|h| h.id), Some(hearing_id));
        assert!(registry.hearing_for_task(11).is_none());
    }

    #[test]
    fn test_set_disposition() {
        let mut registry = HearingRegistry::new();
        registry.add_day(HearingDay::central(1, date(2023, 6, 7)));
        let hearing_id = registry.slot_new_hearing(1, 1).unwrap();

        registry
            .set_disposition(hearing_id, HearingDisposition::Held)
            .unwrap();
        assert_eq!(
            registry.hearing(hearing_id).unwrap().disposition,
            Some(HearingDisposition::Held)
        );
    }
}
