use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sailing instance: a ferry running a route over a concrete time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub ferry_id: Uuid,
    pub route_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_cents: i64,
    /// Whether deposit-backed reservations are accepted for this sailing.
    pub reserve: bool,
}

impl Schedule {
    pub fn new(
        ferry_id: Uuid,
        route_id: Uuid,
        departure_time: DateTime<Utc>,
        arrival_time: DateTime<Utc>,
        price_cents: i64,
        reserve: bool,
    ) -> Result<Self, ScheduleError> {
        let schedule = Self {
            id: Uuid::new_v4(),
            ferry_id,
            route_id,
            departure_time,
            arrival_time,
            price_cents,
            reserve,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.departure_time >= self.arrival_time {
            return Err(ScheduleError::DepartureNotBeforeArrival);
        }
        if self.price_cents < 0 {
            return Err(ScheduleError::NegativePrice(self.price_cents));
        }
        Ok(())
    }

    /// Two sailings overlap when each starts before the other ends.
    pub fn overlaps(&self, other: &Schedule) -> bool {
        self.departure_time < other.arrival_time && self.arrival_time > other.departure_time
    }

    /// Reject a candidate sailing whose window collides with an existing
    /// sailing of the same ferry. Existing entries for other ferries, and the
    /// candidate itself (on update), are ignored.
    pub fn ensure_no_ferry_conflict(&self, existing: &[Schedule]) -> Result<(), ScheduleError> {
        for other in existing {
            if other.id == self.id || other.ferry_id != self.ferry_id {
                continue;
            }
            if self.overlaps(other) {
                return Err(ScheduleError::FerryAlreadyScheduled {
                    ferry_id: self.ferry_id,
                    conflicting_schedule_id: other.id,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Departure time must be before arrival time")]
    DepartureNotBeforeArrival,

    #[error("Price cannot be negative, got {0}")]
    NegativePrice(i64),

    #[error("Ferry {ferry_id} is already scheduled during this time period (conflicts with schedule {conflicting_schedule_id})")]
    FerryAlreadyScheduled {
        ferry_id: Uuid,
        conflicting_schedule_id: Uuid,
    },

    #[error("Schedule not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sailing(ferry_id: Uuid, start_offset_h: i64, end_offset_h: i64) -> Schedule {
        let base = Utc::now();
        Schedule::new(
            ferry_id,
            Uuid::new_v4(),
            base + Duration::hours(start_offset_h),
            base + Duration::hours(end_offset_h),
            150_00,
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_departure_must_precede_arrival() {
        let now = Utc::now();
        let result = Schedule::new(Uuid::new_v4(), Uuid::new_v4(), now, now, 150_00, false);
        assert!(matches!(
            result,
            Err(ScheduleError::DepartureNotBeforeArrival)
        ));
    }

    #[test]
    fn test_overlapping_windows_conflict() {
        let ferry_id = Uuid::new_v4();
        let existing = vec![sailing(ferry_id, 1, 4)];

        let candidate = sailing(ferry_id, 3, 6);
        assert!(matches!(
            candidate.ensure_no_ferry_conflict(&existing),
            Err(ScheduleError::FerryAlreadyScheduled { .. })
        ));
    }

    #[test]
    fn test_back_to_back_windows_do_not_conflict() {
        let ferry_id = Uuid::new_v4();
        let existing = vec![sailing(ferry_id, 1, 4)];

        // Arrives exactly when the next departs.
        let candidate = sailing(ferry_id, 4, 7);
        assert!(candidate.ensure_no_ferry_conflict(&existing).is_ok());
    }

    #[test]
    fn test_other_ferries_do_not_conflict() {
        let existing = vec![sailing(Uuid::new_v4(), 1, 4)];

        let candidate = sailing(Uuid::new_v4(), 2, 5);
        assert!(candidate.ensure_no_ferry_conflict(&existing).is_ok());
    }

    #[test]
    fn test_update_does_not_conflict_with_itself() {
        let ferry_id = Uuid::new_v4();
        let schedule = sailing(ferry_id, 1, 4);
        let existing = vec![schedule.clone()];
        assert!(schedule.ensure_no_ferry_conflict(&existing).is_ok());
    }
}
