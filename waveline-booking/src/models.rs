use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ticket status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Active,
    Used,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketPaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

/// Reservation status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Gcash,
    Paymaya,
    BankTransfer,
    Cash,
    #[serde(rename = "7ELEVEN")]
    SevenEleven,
    #[serde(rename = "GRABPAY")]
    GrabPay,
    CoinsPh,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

macro_rules! status_strings {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = BookingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(BookingError::UnknownStatus {
                        entity: stringify!($ty),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

status_strings!(TicketStatus {
    Active => "ACTIVE",
    Used => "USED",
    Cancelled => "CANCELLED",
});

status_strings!(TicketPaymentStatus {
    Unpaid => "UNPAID",
    Paid => "PAID",
    Refunded => "REFUNDED",
});

status_strings!(ReservationStatus {
    Pending => "PENDING",
    Confirmed => "CONFIRMED",
    Cancelled => "CANCELLED",
    Completed => "COMPLETED",
});

status_strings!(PaymentMethod {
    CreditCard => "CREDIT_CARD",
    DebitCard => "DEBIT_CARD",
    Gcash => "GCASH",
    Paymaya => "PAYMAYA",
    BankTransfer => "BANK_TRANSFER",
    Cash => "CASH",
    SevenEleven => "7ELEVEN",
    GrabPay => "GRABPAY",
    CoinsPh => "COINS_PH",
});

status_strings!(PaymentStatus {
    Pending => "PENDING",
    Completed => "COMPLETED",
    Failed => "FAILED",
    Refunded => "REFUNDED",
});

/// A traveller record, one per authenticated subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: Uuid,
    /// Auth subject this passenger belongs to.
    pub subject: String,
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
}

impl Passenger {
    pub fn new(subject: String, full_name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject,
            full_name,
            email,
            contact_number: String::new(),
            address: String::new(),
        }
    }
}

/// An immediately purchased seat on a sailing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub passenger_id: Uuid,
    pub purchase_date: DateTime<Utc>,
    pub seat_number: String,
    pub status: TicketStatus,
    pub payment_status: TicketPaymentStatus,
}

impl Ticket {
    pub fn new(schedule_id: Uuid, passenger_id: Uuid, seat_number: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule_id,
            passenger_id,
            purchase_date: Utc::now(),
            seat_number,
            status: TicketStatus::Active,
            payment_status: TicketPaymentStatus::Unpaid,
        }
    }

    /// Transition: UNPAID -> PAID
    pub fn mark_paid(&mut self) -> Result<(), BookingError> {
        if self.status != TicketStatus::Active || self.payment_status != TicketPaymentStatus::Unpaid
        {
            return Err(BookingError::invalid_transition(
                "Ticket",
                self.payment_status.as_str(),
                TicketPaymentStatus::Paid.as_str(),
            ));
        }
        self.payment_status = TicketPaymentStatus::Paid;
        Ok(())
    }

    /// Transition: ACTIVE -> CANCELLED. Time-window gating lives in
    /// `BookingPolicy`; this guards the state machine only.
    pub fn cancel(&mut self) -> Result<(), BookingError> {
        if self.status != TicketStatus::Active {
            return Err(BookingError::invalid_transition(
                "Ticket",
                self.status.as_str(),
                TicketStatus::Cancelled.as_str(),
            ));
        }
        self.status = TicketStatus::Cancelled;
        if self.payment_status == TicketPaymentStatus::Paid {
            self.payment_status = TicketPaymentStatus::Refunded;
        }
        Ok(())
    }

    /// Transition: ACTIVE + PAID -> USED (boarding).
    pub fn mark_used(&mut self) -> Result<(), BookingError> {
        if self.status != TicketStatus::Active || self.payment_status != TicketPaymentStatus::Paid {
            return Err(BookingError::invalid_transition(
                "Ticket",
                self.status.as_str(),
                TicketStatus::Used.as_str(),
            ));
        }
        self.status = TicketStatus::Used;
        Ok(())
    }
}

/// A deposit-backed, time-limited hold on a sailing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reservation {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub passenger_id: Uuid,
    pub reserved_at: DateTime<Utc>,
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn new(schedule_id: Uuid, passenger_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            schedule_id,
            passenger_id,
            reserved_at: Utc::now(),
            status: ReservationStatus::Pending,
        }
    }

    /// Transition: PENDING -> CONFIRMED (deposit received).
    pub fn confirm(&mut self) -> Result<(), BookingError> {
        if self.status != ReservationStatus::Pending {
            return Err(BookingError::invalid_transition(
                "Reservation",
                self.status.as_str(),
                ReservationStatus::Confirmed.as_str(),
            ));
        }
        self.status = ReservationStatus::Confirmed;
        Ok(())
    }

    /// Transition: PENDING | CONFIRMED -> CANCELLED.
    pub fn cancel(&mut self) -> Result<(), BookingError> {
        match self.status {
            ReservationStatus::Pending | ReservationStatus::Confirmed => {
                self.status = ReservationStatus::Cancelled;
                Ok(())
            }
            other => Err(BookingError::invalid_transition(
                "Reservation",
                other.as_str(),
                ReservationStatus::Cancelled.as_str(),
            )),
        }
    }

    /// Transition: CONFIRMED -> COMPLETED (converted to a boarding-ready
    /// booking).
    pub fn complete(&mut self) -> Result<(), BookingError> {
        if self.status != ReservationStatus::Confirmed {
            return Err(BookingError::invalid_transition(
                "Reservation",
                self.status.as_str(),
                ReservationStatus::Completed.as_str(),
            ));
        }
        self.status = ReservationStatus::Completed;
        Ok(())
    }
}

/// What a payment settles. Exactly one target, by construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentTarget {
    Ticket(Uuid),
    Reservation(Uuid),
}

/// A transaction recorded against a ticket or a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub target: PaymentTarget,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_reference: String,
    pub payment_date: DateTime<Utc>,
}

impl Payment {
    /// Full-price payment for a ticket.
    pub fn for_ticket(ticket_id: Uuid, amount_cents: i64, method: PaymentMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            target: PaymentTarget::Ticket(ticket_id),
            amount_cents,
            method,
            status: PaymentStatus::Completed,
            transaction_reference: transaction_reference("TXN"),
            payment_date: Utc::now(),
        }
    }

    /// Deposit payment securing a reservation.
    pub fn deposit_for(reservation_id: Uuid, amount_cents: i64, method: PaymentMethod) -> Self {
        Self {
            id: Uuid::new_v4(),
            target: PaymentTarget::Reservation(reservation_id),
            amount_cents,
            method,
            status: PaymentStatus::Completed,
            transaction_reference: transaction_reference("RES"),
            payment_date: Utc::now(),
        }
    }

    /// Counter-entry returning the original amount through the same method.
    pub fn refund_of(original: &Payment) -> Self {
        Self {
            id: Uuid::new_v4(),
            target: original.target,
            amount_cents: original.amount_cents,
            method: original.method,
            status: PaymentStatus::Refunded,
            transaction_reference: transaction_reference("REF"),
            payment_date: Utc::now(),
        }
    }
}

fn transaction_reference(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &hex[..12])
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{entity}: invalid state transition from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Unknown {entity} value: {value}")]
    UnknownStatus {
        entity: &'static str,
        value: String,
    },

    #[error("Ticket not found: {0}")]
    TicketNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),
}

impl BookingError {
    fn invalid_transition(entity: &'static str, from: &str, to: &str) -> Self {
        Self::InvalidTransition {
            entity,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_lifecycle() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4(), "A1".to_string());
        assert_eq!(ticket.status, TicketStatus::Active);
        assert_eq!(ticket.payment_status, TicketPaymentStatus::Unpaid);

        ticket.mark_paid().unwrap();
        assert_eq!(ticket.payment_status, TicketPaymentStatus::Paid);

        ticket.mark_used().unwrap();
        assert_eq!(ticket.status, TicketStatus::Used);
    }

    #[test]
    fn test_ticket_cannot_be_paid_twice() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4(), "A1".to_string());
        ticket.mark_paid().unwrap();
        assert!(ticket.mark_paid().is_err());
    }

    #[test]
    fn test_unpaid_ticket_cannot_board() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4(), "A1".to_string());
        assert!(ticket.mark_used().is_err());
    }

    #[test]
    fn test_cancelling_paid_ticket_flags_refund() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4(), "B4".to_string());
        ticket.mark_paid().unwrap();
        ticket.cancel().unwrap();
        assert_eq!(ticket.status, TicketStatus::Cancelled);
        assert_eq!(ticket.payment_status, TicketPaymentStatus::Refunded);
    }

    #[test]
    fn test_used_ticket_cannot_be_cancelled() {
        let mut ticket = Ticket::new(Uuid::new_v4(), Uuid::new_v4(), "B4".to_string());
        ticket.mark_paid().unwrap();
        ticket.mark_used().unwrap();
        assert!(matches!(
            ticket.cancel(),
            Err(BookingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_reservation_lifecycle() {
        let mut reservation = Reservation::new(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(reservation.status, ReservationStatus::Pending);

        reservation.confirm().unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);

        reservation.complete().unwrap();
        assert_eq!(reservation.status, ReservationStatus::Completed);
    }

    #[test]
    fn test_pending_reservation_cannot_complete() {
        let mut reservation = Reservation::new(Uuid::new_v4(), Uuid::new_v4());
        assert!(reservation.complete().is_err());
    }

    #[test]
    fn test_cancelled_reservation_is_terminal() {
        let mut reservation = Reservation::new(Uuid::new_v4(), Uuid::new_v4());
        reservation.cancel().unwrap();
        assert!(reservation.confirm().is_err());
        assert!(reservation.cancel().is_err());
    }

    #[test]
    fn test_payment_targets_exactly_one_record() {
        let ticket_id = Uuid::new_v4();
        let payment = Payment::for_ticket(ticket_id, 150_00, PaymentMethod::Gcash);
        assert_eq!(payment.target, PaymentTarget::Ticket(ticket_id));
        assert!(payment.transaction_reference.starts_with("TXN-"));
        assert_eq!(payment.transaction_reference.len(), 16);
    }

    #[test]
    fn test_refund_mirrors_the_original() {
        let deposit = Payment::deposit_for(Uuid::new_v4(), 30_00, PaymentMethod::Paymaya);
        assert!(deposit.transaction_reference.starts_with("RES-"));

        let refund = Payment::refund_of(&deposit);
        assert_eq!(refund.target, deposit.target);
        assert_eq!(refund.amount_cents, 30_00);
        assert_eq!(refund.method, PaymentMethod::Paymaya);
        assert_eq!(refund.status, PaymentStatus::Refunded);
        assert!(refund.transaction_reference.starts_with("REF-"));
    }

    #[test]
    fn test_status_round_trip_through_strings() {
        assert_eq!(
            "CONFIRMED".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::Confirmed
        );
        assert_eq!(PaymentMethod::SevenEleven.as_str(), "7ELEVEN");
        assert_eq!(
            "7ELEVEN".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::SevenEleven
        );
        assert!("SOMETIMES".parse::<TicketStatus>().is_err());
    }
}
