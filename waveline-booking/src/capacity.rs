use std::collections::HashSet;
use uuid::Uuid;

/// Point-in-time seat accounting for one sailing. Active tickets and held
/// (pending or confirmed) reservations both consume capacity.
#[derive(Debug, Clone, Copy)]
pub struct CapacitySnapshot {
    pub capacity: i32,
    pub active_tickets: i64,
    pub held_reservations: i64,
}

impl CapacitySnapshot {
    pub fn remaining(&self) -> i64 {
        self.capacity as i64 - self.active_tickets - self.held_reservations
    }

    pub fn ensure_space(&self, schedule_id: Uuid) -> Result<(), CapacityError> {
        if self.remaining() <= 0 {
            return Err(CapacityError::FullyBooked { schedule_id });
        }
        Ok(())
    }
}

const SEAT_ROWS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SEATS_PER_ROW: u32 = 30;

/// First free seat label (A1, A2, ..., Z30) not already taken on the sailing.
pub fn assign_seat(taken: &HashSet<String>) -> Option<String> {
    for row in SEAT_ROWS.chars() {
        for num in 1..=SEATS_PER_ROW {
            let seat = format!("{}{}", row, num);
            if !taken.contains(&seat) {
                return Some(seat);
            }
        }
    }
    None
}

#[derive(Debug, thiserror::Error)]
pub enum CapacityError {
    #[error("Schedule {schedule_id} is fully booked")]
    FullyBooked { schedule_id: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tickets_and_reservations_both_consume_capacity() {
        let snapshot = CapacitySnapshot {
            capacity: 100,
            active_tickets: 60,
            held_reservations: 39,
        };
        assert_eq!(snapshot.remaining(), 1);
        assert!(snapshot.ensure_space(Uuid::new_v4()).is_ok());

        let full = CapacitySnapshot {
            capacity: 100,
            active_tickets: 60,
            held_reservations: 40,
        };
        assert_eq!(full.remaining(), 0);
        assert!(matches!(
            full.ensure_space(Uuid::new_v4()),
            Err(CapacityError::FullyBooked { .. })
        ));
    }

    #[test]
    fn test_seat_assignment_skips_taken_seats() {
        let mut taken = HashSet::new();
        taken.insert("A1".to_string());
        taken.insert("A2".to_string());
        assert_eq!(assign_seat(&taken), Some("A3".to_string()));
    }

    #[test]
    fn test_seat_assignment_moves_to_next_row() {
        let taken: HashSet<String> = (1..=30).map(|n| format!("A{}", n)).collect();
        assert_eq!(assign_seat(&taken), Some("B1".to_string()));
    }

    #[test]
    fn test_no_seat_left_when_grid_exhausted() {
        let taken: HashSet<String> = SEAT_ROWS
            .chars()
            .flat_map(|row| (1..=30).map(move |n| format!("{}{}", row, n)))
            .collect();
        assert_eq!(assign_seat(&taken), None);
    }
}
