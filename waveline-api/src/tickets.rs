use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use waveline_booking::{
    assign_seat, CapacitySnapshot, Payment, PaymentMethod, PaymentStatus, PaymentTarget, Ticket,
    TicketPaymentStatus,
};
use waveline_catalog::Schedule;
use waveline_shared::events::{TicketIssuedEvent, TicketPaidEvent};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::passengers::current_passenger;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PurchaseTicketRequest {
    pub schedule_id: Uuid,
    pub seat_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayTicketRequest {
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub seat_number: String,
    pub status: String,
    pub payment_status: String,
    pub purchase_date: chrono::DateTime<chrono::Utc>,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id,
            schedule_id: ticket.schedule_id,
            seat_number: ticket.seat_number.clone(),
            status: ticket.status.to_string(),
            payment_status: ticket.payment_status.to_string(),
            purchase_date: ticket.purchase_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: Uuid,
    pub amount_cents: i64,
    pub method: String,
    pub status: String,
    pub transaction_reference: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            amount_cents: payment.amount_cents,
            method: payment.method.to_string(),
            status: payment.status.to_string(),
            transaction_reference: payment.transaction_reference.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TicketDetailResponse {
    #[serde(flatten)]
    pub ticket: TicketResponse,
    pub payments: Vec<PaymentResponse>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/tickets", post(purchase_ticket).get(list_tickets))
        .route("/v1/tickets/{id}", get(get_ticket))
        .route("/v1/tickets/{id}/pay", post(pay_ticket))
        .route("/v1/tickets/{id}/cancel", post(cancel_ticket))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/tickets
/// Purchase a ticket on a sailing. Seat is assigned when not requested.
async fn purchase_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<PurchaseTicketRequest>,
) -> Result<Json<TicketResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let schedule = load_schedule(&state, req.schedule_id).await?;

    let now = Utc::now();
    state
        .policy
        .ensure_purchasable(&schedule, now)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    ensure_capacity(&state, &schedule).await?;

    let taken: HashSet<String> = state
        .ticket_repo
        .active_seats(schedule.id)
        .await
        .map_err(AppError::internal)?
        .into_iter()
        .collect();

    let seat_number = match req.seat_number {
        Some(seat) => {
            if taken.contains(&seat) {
                return Err(AppError::ConflictError(format!(
                    "Seat {} is already taken",
                    seat
                )));
            }
            seat
        }
        None => assign_seat(&taken).ok_or_else(|| {
            AppError::ConflictError("Sorry, this schedule is fully booked".to_string())
        })?,
    };

    let ticket = Ticket::new(schedule.id, passenger.id, seat_number);
    state
        .ticket_repo
        .create(&ticket)
        .await
        .map_err(AppError::internal)?;

    let event = TicketIssuedEvent {
        ticket_id: ticket.id,
        schedule_id: schedule.id,
        passenger_id: passenger.id,
        seat_number: ticket.seat_number.clone(),
        issued_at: now.timestamp(),
    };
    info!(event = ?event, "ticket issued");

    Ok(Json(TicketResponse::from(&ticket)))
}

/// POST /v1/tickets/:id/pay
/// Record a full-price payment through the gateway.
async fn pay_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(ticket_id): Path<Uuid>,
    Json(req): Json<PayTicketRequest>,
) -> Result<Json<TicketDetailResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let mut ticket = load_owned_ticket(&state, ticket_id, passenger.id).await?;

    if ticket.payment_status == TicketPaymentStatus::Paid {
        return Err(AppError::ConflictError(
            "This ticket has already been paid for".to_string(),
        ));
    }

    let schedule = load_schedule(&state, ticket.schedule_id).await?;

    state
        .gateway
        .charge(schedule.price_cents, req.payment_method)
        .await
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let payment = Payment::for_ticket(ticket.id, schedule.price_cents, req.payment_method);
    state
        .payment_repo
        .create(&payment)
        .await
        .map_err(AppError::internal)?;

    ticket
        .mark_paid()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .ticket_repo
        .update(&ticket)
        .await
        .map_err(AppError::internal)?;

    let event = TicketPaidEvent {
        ticket_id: ticket.id,
        amount_cents: payment.amount_cents,
        transaction_reference: payment.transaction_reference.clone(),
        timestamp: Utc::now().timestamp(),
    };
    info!(event = ?event, "ticket paid");

    Ok(Json(TicketDetailResponse {
        ticket: TicketResponse::from(&ticket),
        payments: vec![PaymentResponse::from(&payment)],
    }))
}

/// POST /v1/tickets/:id/cancel
/// Cancel an active ticket outside the cutoff window, refunding when paid.
async fn cancel_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let mut ticket = load_owned_ticket(&state, ticket_id, passenger.id).await?;
    let schedule = load_schedule(&state, ticket.schedule_id).await?;

    state
        .policy
        .ensure_ticket_cancellable(schedule.departure_time, Utc::now())
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let was_paid = ticket.payment_status == TicketPaymentStatus::Paid;
    ticket
        .cancel()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .ticket_repo
        .update(&ticket)
        .await
        .map_err(AppError::internal)?;

    if was_paid {
        refund_completed_payment(&state, PaymentTarget::Ticket(ticket.id)).await?;
    }

    info!(ticket_id = %ticket.id, "ticket cancelled");

    Ok(Json(TicketResponse::from(&ticket)))
}

/// GET /v1/tickets/:id
async fn get_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketDetailResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let ticket = load_owned_ticket(&state, ticket_id, passenger.id).await?;

    let payments = state
        .payment_repo
        .list_for_target(PaymentTarget::Ticket(ticket.id))
        .await
        .map_err(AppError::internal)?;

    Ok(Json(TicketDetailResponse {
        ticket: TicketResponse::from(&ticket),
        payments: payments.iter().map(PaymentResponse::from).collect(),
    }))
}

/// GET /v1/tickets
async fn list_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<Vec<TicketResponse>>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let tickets = state
        .ticket_repo
        .list_for_passenger(passenger.id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(tickets.iter().map(TicketResponse::from).collect()))
}

// ============================================================================
// Helpers shared with the reservations module
// ============================================================================

pub(crate) async fn load_schedule(
    state: &AppState,
    schedule_id: Uuid,
) -> Result<Schedule, AppError> {
    state
        .schedule_repo
        .get_schedule(schedule_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Schedule not found: {}", schedule_id)))
}

/// Active tickets and held reservations both count against the ferry.
pub(crate) async fn ensure_capacity(
    state: &AppState,
    schedule: &Schedule,
) -> Result<(), AppError> {
    let ferry = state
        .catalog_repo
        .get_ferry(schedule.ferry_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| {
            AppError::InternalServerError(format!("Ferry missing for schedule {}", schedule.id))
        })?;

    let snapshot = CapacitySnapshot {
        capacity: ferry.capacity,
        active_tickets: state
            .ticket_repo
            .count_active(schedule.id)
            .await
            .map_err(AppError::internal)?,
        held_reservations: state
            .reservation_repo
            .count_held(schedule.id)
            .await
            .map_err(AppError::internal)?,
    };

    snapshot
        .ensure_space(schedule.id)
        .map_err(|e| AppError::ConflictError(e.to_string()))
}

/// Issue a refund for the completed payment on a target, if one exists.
pub(crate) async fn refund_completed_payment(
    state: &AppState,
    target: PaymentTarget,
) -> Result<Option<Payment>, AppError> {
    let payments = state
        .payment_repo
        .list_for_target(target)
        .await
        .map_err(AppError::internal)?;

    let Some(original) = payments
        .iter()
        .find(|p| p.status == PaymentStatus::Completed)
    else {
        return Ok(None);
    };

    state
        .gateway
        .refund(&original.transaction_reference, original.amount_cents)
        .await
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    let refund = Payment::refund_of(original);
    state
        .payment_repo
        .create(&refund)
        .await
        .map_err(AppError::internal)?;

    Ok(Some(refund))
}

async fn load_owned_ticket(
    state: &AppState,
    ticket_id: Uuid,
    passenger_id: Uuid,
) -> Result<Ticket, AppError> {
    let ticket = state
        .ticket_repo
        .get(ticket_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Ticket not found: {}", ticket_id)))?;

    if ticket.passenger_id != passenger_id {
        return Err(AppError::AuthorizationError(
            "This ticket does not belong to you".to_string(),
        ));
    }

    Ok(ticket)
}
