pub mod capacity;
pub mod deposit;
pub mod models;
pub mod policy;

pub use capacity::{assign_seat, CapacityError, CapacitySnapshot};
pub use deposit::{
    deposit_amount, DepositError, DEFAULT_DEPOSIT_PERCENT, MAX_DEPOSIT_PERCENT,
    MIN_DEPOSIT_PERCENT,
};
pub use models::{
    BookingError, Passenger, Payment, PaymentMethod, PaymentStatus, PaymentTarget, Reservation,
    ReservationStatus, Ticket, TicketPaymentStatus, TicketStatus,
};
pub use policy::{BookingPolicy, PolicyError};
