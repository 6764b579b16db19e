use chrono::{DateTime, Duration, Utc};
use waveline_catalog::Schedule;

use crate::models::{Reservation, ReservationStatus};

/// Time-window gates around the booking lifecycle. All checks take `now`
/// explicitly so they stay deterministic under test.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Minimum lead time between placing a reservation and departure.
    pub reservation_lead: Duration,
    /// Tickets cannot be cancelled closer to departure than this.
    pub ticket_cancel_cutoff: Duration,
    /// Reservations cannot be cancelled closer to departure than this.
    pub reservation_cancel_cutoff: Duration,
    /// How long a PENDING reservation survives without a deposit.
    pub pending_ttl: Duration,
    /// Default deposit percentage when the passenger does not choose one.
    pub default_deposit_percent: u8,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            reservation_lead: Duration::hours(24),
            ticket_cancel_cutoff: Duration::hours(24),
            reservation_cancel_cutoff: Duration::hours(48),
            pending_ttl: Duration::hours(24),
            default_deposit_percent: 20,
        }
    }
}

impl BookingPolicy {
    pub fn from_hours(
        reservation_lead_hours: i64,
        ticket_cancel_cutoff_hours: i64,
        reservation_cancel_cutoff_hours: i64,
        pending_ttl_hours: i64,
        default_deposit_percent: u8,
    ) -> Self {
        Self {
            reservation_lead: Duration::hours(reservation_lead_hours),
            ticket_cancel_cutoff: Duration::hours(ticket_cancel_cutoff_hours),
            reservation_cancel_cutoff: Duration::hours(reservation_cancel_cutoff_hours),
            pending_ttl: Duration::hours(pending_ttl_hours),
            default_deposit_percent,
        }
    }

    /// Tickets can be bought for any sailing that has not yet departed.
    pub fn ensure_purchasable(
        &self,
        schedule: &Schedule,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        if schedule.departure_time < now {
            return Err(PolicyError::PastDeparture);
        }
        Ok(())
    }

    /// Reservations additionally require the reserve flag and a minimum
    /// lead time before departure.
    pub fn ensure_reservable(
        &self,
        schedule: &Schedule,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        if !schedule.reserve {
            return Err(PolicyError::ReservationsNotAccepted);
        }
        if schedule.departure_time < now {
            return Err(PolicyError::PastDeparture);
        }
        if schedule.departure_time - now < self.reservation_lead {
            return Err(PolicyError::InsideReservationLead {
                hours: self.reservation_lead.num_hours(),
            });
        }
        Ok(())
    }

    pub fn ensure_ticket_cancellable(
        &self,
        departure_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        if departure_time - now < self.ticket_cancel_cutoff {
            return Err(PolicyError::TicketCancelWindowClosed {
                hours: self.ticket_cancel_cutoff.num_hours(),
            });
        }
        Ok(())
    }

    pub fn ensure_reservation_cancellable(
        &self,
        departure_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        if departure_time - now < self.reservation_cancel_cutoff {
            return Err(PolicyError::ReservationCancelWindowClosed {
                hours: self.reservation_cancel_cutoff.num_hours(),
            });
        }
        Ok(())
    }

    /// Completing a reservation requires a sailing still in the future.
    pub fn ensure_convertible(
        &self,
        departure_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), PolicyError> {
        if departure_time < now {
            return Err(PolicyError::PastDeparture);
        }
        Ok(())
    }

    /// When an unconfirmed reservation stops holding its seat.
    pub fn reservation_deadline(&self, reserved_at: DateTime<Utc>) -> DateTime<Utc> {
        reserved_at + self.pending_ttl
    }

    pub fn is_reservation_expired(&self, reservation: &Reservation, now: DateTime<Utc>) -> bool {
        reservation.status == ReservationStatus::Pending
            && now > self.reservation_deadline(reservation.reserved_at)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("This schedule does not allow reservations")]
    ReservationsNotAccepted,

    #[error("This schedule has already departed")]
    PastDeparture,

    #[error("Reservations must be made at least {hours} hours before departure")]
    InsideReservationLead { hours: i64 },

    #[error("Tickets cannot be cancelled within {hours} hours of departure")]
    TicketCancelWindowClosed { hours: i64 },

    #[error("Reservations cannot be cancelled within {hours} hours of departure")]
    ReservationCancelWindowClosed { hours: i64 },

    #[error("This reservation has expired")]
    ReservationExpired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sailing_departing_in(hours: i64, reserve: bool) -> Schedule {
        let now = Utc::now();
        Schedule::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            now + Duration::hours(hours),
            now + Duration::hours(hours + 2),
            180_00,
            reserve,
        )
        .unwrap()
    }

    #[test]
    fn test_past_sailings_cannot_be_purchased() {
        let now = Utc::now();
        let mut schedule = sailing_departing_in(2, false);
        schedule.departure_time = now - Duration::hours(1);

        let policy = BookingPolicy::default();
        assert!(matches!(
            policy.ensure_purchasable(&schedule, now),
            Err(PolicyError::PastDeparture)
        ));
    }

    #[test]
    fn test_reserve_flag_gates_reservations() {
        let policy = BookingPolicy::default();
        let schedule = sailing_departing_in(72, false);
        assert!(matches!(
            policy.ensure_reservable(&schedule, Utc::now()),
            Err(PolicyError::ReservationsNotAccepted)
        ));
    }

    #[test]
    fn test_reservation_needs_24h_lead() {
        let policy = BookingPolicy::default();

        let too_close = sailing_departing_in(23, true);
        assert!(matches!(
            policy.ensure_reservable(&too_close, Utc::now()),
            Err(PolicyError::InsideReservationLead { hours: 24 })
        ));

        let far_enough = sailing_departing_in(25, true);
        assert!(policy.ensure_reservable(&far_enough, Utc::now()).is_ok());
    }

    #[test]
    fn test_ticket_cancel_cutoff() {
        let policy = BookingPolicy::default();
        let now = Utc::now();

        assert!(policy
            .ensure_ticket_cancellable(now + Duration::hours(25), now)
            .is_ok());
        assert!(matches!(
            policy.ensure_ticket_cancellable(now + Duration::hours(23), now),
            Err(PolicyError::TicketCancelWindowClosed { hours: 24 })
        ));
    }

    #[test]
    fn test_reservation_cancel_cutoff_is_wider() {
        let policy = BookingPolicy::default();
        let now = Utc::now();

        // 36h out: a ticket could still be cancelled, a reservation cannot.
        let departure = now + Duration::hours(36);
        assert!(policy.ensure_ticket_cancellable(departure, now).is_ok());
        assert!(matches!(
            policy.ensure_reservation_cancellable(departure, now),
            Err(PolicyError::ReservationCancelWindowClosed { hours: 48 })
        ));
    }

    #[test]
    fn test_pending_reservation_expires_after_ttl() {
        let policy = BookingPolicy::default();
        let mut reservation = Reservation::new(Uuid::new_v4(), Uuid::new_v4());
        reservation.reserved_at = Utc::now() - Duration::hours(25);

        assert!(policy.is_reservation_expired(&reservation, Utc::now()));

        reservation.confirm().unwrap();
        assert!(!policy.is_reservation_expired(&reservation, Utc::now()));
    }

    #[test]
    fn test_fresh_pending_reservation_is_not_expired() {
        let policy = BookingPolicy::default();
        let reservation = Reservation::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(!policy.is_reservation_expired(&reservation, Utc::now()));
    }
}
