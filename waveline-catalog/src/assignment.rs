use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::Schedule;

/// A staff duty binding: this crew member works this ferry on this sailing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FerryAssignment {
    pub id: Uuid,
    pub ferry_id: Uuid,
    pub schedule_id: Uuid,
    pub staff_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

impl FerryAssignment {
    pub fn new(ferry_id: Uuid, schedule_id: Uuid, staff_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            ferry_id,
            schedule_id,
            staff_id,
            assigned_at: Utc::now(),
        }
    }
}

/// Sailing windows already claimed by assignments of one ferry.
#[derive(Debug, Clone)]
pub struct AssignedWindow {
    pub assignment_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}

/// A ferry cannot be assigned to two sailings whose windows overlap.
/// `existing` holds the windows of the ferry's current assignments;
/// the candidate assignment itself is ignored on re-validation.
pub fn ensure_no_assignment_conflict(
    candidate: &FerryAssignment,
    candidate_sailing: &Schedule,
    existing: &[AssignedWindow],
) -> Result<(), AssignmentError> {
    for window in existing {
        if window.assignment_id == candidate.id {
            continue;
        }
        if candidate_sailing.departure_time < window.arrival_time
            && candidate_sailing.arrival_time > window.departure_time
        {
            return Err(AssignmentError::FerryAlreadyAssigned {
                ferry_id: candidate.ferry_id,
                conflicting_assignment_id: window.assignment_id,
            });
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AssignmentError {
    #[error("Ferry {ferry_id} is already assigned to another schedule during this time period (conflicts with assignment {conflicting_assignment_id})")]
    FerryAlreadyAssigned {
        ferry_id: Uuid,
        conflicting_assignment_id: Uuid,
    },

    #[error("Assignment not found: {0}")]
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
            200_00,
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_overlapping_assignment_rejected() {
        let ferry_id = Uuid::new_v4();
        let taken = sailing(ferry_id, 2, 5);
        let existing = vec![AssignedWindow {
            assignment_id: Uuid::new_v4(),
            departure_time: taken.departure_time,
            arrival_time: taken.arrival_time,
        }];

        let next = sailing(ferry_id, 4, 8);
        let candidate = FerryAssignment::new(ferry_id, next.id, Uuid::new_v4());

        assert!(matches!(
            ensure_no_assignment_conflict(&candidate, &next, &existing),
            Err(AssignmentError::FerryAlreadyAssigned { .. })
        ));
    }

    #[test]
    fn test_disjoint_assignment_accepted() {
        let ferry_id = Uuid::new_v4();
        let taken = sailing(ferry_id, 2, 5);
        let existing = vec![AssignedWindow {
            assignment_id: Uuid::new_v4(),
            departure_time: taken.departure_time,
            arrival_time: taken.arrival_time,
        }];

        let next = sailing(ferry_id, 6, 9);
        let candidate = FerryAssignment::new(ferry_id, next.id, Uuid::new_v4());

        assert!(ensure_no_assignment_conflict(&candidate, &next, &existing).is_ok());
    }

    #[test]
    fn test_revalidation_skips_own_window() {
        let ferry_id = Uuid::new_v4();
        let next = sailing(ferry_id, 6, 9);
        let candidate = FerryAssignment::new(ferry_id, next.id, Uuid::new_v4());
        let existing = vec![AssignedWindow {
            assignment_id: candidate.id,
            departure_time: next.departure_time,
            arrival_time: next.arrival_time,
        }];

        assert!(ensure_no_assignment_conflict(&candidate, &next, &existing).is_ok());
    }
}
