use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TicketIssuedEvent {
    pub ticket_id: Uuid,
    pub schedule_id: Uuid,
    pub passenger_id: Uuid,
    pub seat_number: String,
    pub issued_at: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct TicketPaidEvent {
    pub ticket_id: Uuid,
    pub amount_cents: i64,
    pub transaction_reference: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationConfirmedEvent {
    pub reservation_id: Uuid,
    pub schedule_id: Uuid,
    pub deposit_cents: i64,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ReservationExpiredEvent {
    pub reservation_id: Uuid,
    pub schedule_id: Uuid,
    pub timestamp: i64,
}
