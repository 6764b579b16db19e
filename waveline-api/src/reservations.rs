use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use waveline_booking::{
    deposit_amount, Payment, PaymentMethod, PaymentStatus, PaymentTarget, Reservation,
    ReservationStatus,
};
use waveline_shared::events::{ReservationConfirmedEvent, ReservationExpiredEvent};

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::passengers::current_passenger;
use crate::state::AppState;
use crate::tickets::{ensure_capacity, load_schedule, refund_completed_payment, PaymentResponse};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub schedule_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub payment_method: PaymentMethod,
    /// Share of the ticket price to put down, 10-100. The configured
    /// default applies when omitted.
    pub deposit_percent: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub status: String,
    pub reserved_at: DateTime<Utc>,
    /// When a still-pending reservation stops holding its seat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ReservationDetailResponse {
    #[serde(flatten)]
    pub reservation: ReservationResponse,
    pub payments: Vec<PaymentResponse>,
}

fn reservation_response(state: &AppState, reservation: &Reservation) -> ReservationResponse {
    let expires_at = (reservation.status == ReservationStatus::Pending)
        .then(|| state.policy.reservation_deadline(reservation.reserved_at));
    ReservationResponse {
        id: reservation.id,
        schedule_id: reservation.schedule_id,
        status: reservation.status.to_string(),
        reserved_at: reservation.reserved_at,
        expires_at,
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/reservations",
            post(create_reservation).get(list_reservations),
        )
        .route("/v1/reservations/{id}", get(get_reservation))
        .route("/v1/reservations/{id}/deposit", post(pay_deposit))
        .route("/v1/reservations/{id}/cancel", post(cancel_reservation))
        .route("/v1/reservations/{id}/convert", post(convert_reservation))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/reservations
/// Place a deposit-backed hold on a reservable sailing.
async fn create_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<Json<ReservationResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let schedule = load_schedule(&state, req.schedule_id).await?;

    state
        .policy
        .ensure_reservable(&schedule, Utc::now())
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    ensure_capacity(&state, &schedule).await?;

    let reservation = Reservation::new(schedule.id, passenger.id);
    state
        .reservation_repo
        .create(&reservation)
        .await
        .map_err(AppError::internal)?;

    info!(
        reservation_id = %reservation.id,
        schedule_id = %schedule.id,
        "reservation placed"
    );

    Ok(Json(reservation_response(&state, &reservation)))
}

/// POST /v1/reservations/:id/deposit
/// Pay the deposit securing a pending reservation, confirming it.
async fn pay_deposit(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(reservation_id): Path<Uuid>,
    Json(req): Json<DepositRequest>,
) -> Result<Json<ReservationDetailResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let mut reservation = load_owned_reservation(&state, reservation_id, passenger.id).await?;

    // The sweep may not have caught up with this reservation yet.
    if expire_if_stale(&state, &mut reservation, Utc::now()).await? {
        return Err(AppError::GoneError(
            "This reservation has expired".to_string(),
        ));
    }

    if reservation.status != ReservationStatus::Pending {
        return Err(AppError::ConflictError(format!(
            "Reservation is {} and cannot take a deposit",
            reservation.status
        )));
    }

    let schedule = load_schedule(&state, reservation.schedule_id).await?;

    let percent = req
        .deposit_percent
        .unwrap_or(state.policy.default_deposit_percent);
    let amount_cents = deposit_amount(schedule.price_cents, percent)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .gateway
        .charge(amount_cents, req.payment_method)
        .await
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let payment = Payment::deposit_for(reservation.id, amount_cents, req.payment_method);
    state
        .payment_repo
        .create(&payment)
        .await
        .map_err(AppError::internal)?;

    reservation
        .confirm()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .reservation_repo
        .update(&reservation)
        .await
        .map_err(AppError::internal)?;

    let event = ReservationConfirmedEvent {
        reservation_id: reservation.id,
        schedule_id: schedule.id,
        deposit_cents: amount_cents,
        timestamp: Utc::now().timestamp(),
    };
    info!(event = ?event, "reservation confirmed");

    Ok(Json(ReservationDetailResponse {
        reservation: reservation_response(&state, &reservation),
        payments: vec![PaymentResponse::from(&payment)],
    }))
}

/// POST /v1/reservations/:id/cancel
/// Cancel a pending or confirmed reservation outside the cutoff window,
/// refunding any deposit taken.
async fn cancel_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ReservationResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let mut reservation = load_owned_reservation(&state, reservation_id, passenger.id).await?;
    let schedule = load_schedule(&state, reservation.schedule_id).await?;

    state
        .policy
        .ensure_reservation_cancellable(schedule.departure_time, Utc::now())
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let had_deposit = reservation.status == ReservationStatus::Confirmed;
    reservation
        .cancel()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .reservation_repo
        .update(&reservation)
        .await
        .map_err(AppError::internal)?;

    if had_deposit {
        refund_completed_payment(&state, PaymentTarget::Reservation(reservation.id)).await?;
    }

    info!(reservation_id = %reservation.id, "reservation cancelled");

    Ok(Json(reservation_response(&state, &reservation)))
}

/// POST /v1/reservations/:id/convert
/// Turn a confirmed reservation into a completed, boarding-ready booking.
async fn convert_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ReservationDetailResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let mut reservation = load_owned_reservation(&state, reservation_id, passenger.id).await?;
    let schedule = load_schedule(&state, reservation.schedule_id).await?;

    state
        .policy
        .ensure_convertible(schedule.departure_time, Utc::now())
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let payments = state
        .payment_repo
        .list_for_target(PaymentTarget::Reservation(reservation.id))
        .await
        .map_err(AppError::internal)?;
    if !payments
        .iter()
        .any(|p| p.status == PaymentStatus::Completed)
    {
        return Err(AppError::ValidationError(
            "No deposit has been recorded for this reservation".to_string(),
        ));
    }

    reservation
        .complete()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .reservation_repo
        .update(&reservation)
        .await
        .map_err(AppError::internal)?;

    info!(reservation_id = %reservation.id, "reservation completed");

    Ok(Json(ReservationDetailResponse {
        reservation: reservation_response(&state, &reservation),
        payments: payments.iter().map(PaymentResponse::from).collect(),
    }))
}

/// GET /v1/reservations/:id
async fn get_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<ReservationDetailResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let reservation = load_owned_reservation(&state, reservation_id, passenger.id).await?;

    let payments = state
        .payment_repo
        .list_for_target(PaymentTarget::Reservation(reservation.id))
        .await
        .map_err(AppError::internal)?;

    Ok(Json(ReservationDetailResponse {
        reservation: reservation_response(&state, &reservation),
        payments: payments.iter().map(PaymentResponse::from).collect(),
    }))
}

/// GET /v1/reservations
async fn list_reservations(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<Vec<ReservationResponse>>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    let reservations = state
        .reservation_repo
        .list_for_passenger(passenger.id)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(
        reservations
            .iter()
            .map(|r| reservation_response(&state, r))
            .collect(),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

/// Write back an expiry the background sweep has not recorded yet.
/// Returns true when the reservation was (or had to be) expired.
async fn expire_if_stale(
    state: &AppState,
    reservation: &mut Reservation,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    if !state.policy.is_reservation_expired(reservation, now) {
        return Ok(false);
    }

    reservation
        .cancel()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .reservation_repo
        .update(reservation)
        .await
        .map_err(AppError::internal)?;

    let event = ReservationExpiredEvent {
        reservation_id: reservation.id,
        schedule_id: reservation.schedule_id,
        timestamp: now.timestamp(),
    };
    info!(event = ?event, "reservation expired on access");

    Ok(true)
}

async fn load_owned_reservation(
    state: &AppState,
    reservation_id: Uuid,
    passenger_id: Uuid,
) -> Result<Reservation, AppError> {
    let reservation = state
        .reservation_repo
        .get(reservation_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| {
            AppError::NotFoundError(format!("Reservation not found: {}", reservation_id))
        })?;

    if reservation.passenger_id != passenger_id {
        return Err(AppError::AuthorizationError(
            "This reservation does not belong to you".to_string(),
        ));
    }

    Ok(reservation)
}
