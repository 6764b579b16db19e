use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use waveline_booking::Passenger;
use waveline_shared::Masked;

use crate::{error::AppError, middleware::auth::CustomerClaims, state::AppState};

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub email: Masked<String>,
    pub contact_number: Masked<String>,
    pub address: Masked<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub full_name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
}

impl From<Passenger> for ProfileResponse {
    fn from(passenger: Passenger) -> Self {
        Self {
            full_name: passenger.full_name,
            email: passenger.email,
            contact_number: passenger.contact_number,
            address: passenger.address,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/profile", get(get_profile).put(update_profile))
}

/// GET /v1/profile
async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<ProfileResponse>, AppError> {
    let passenger = current_passenger(&state, &claims).await?;
    Ok(Json(ProfileResponse::from(passenger)))
}

/// PUT /v1/profile
async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let mut passenger = current_passenger(&state, &claims).await?;

    // Contact fields arrive wrapped in Masked, so this cannot leak them.
    info!(passenger_id = %passenger.id, update = ?req, "profile updated");

    passenger.full_name = req.full_name;
    passenger.email = req.email.into_inner();
    passenger.contact_number = req.contact_number.into_inner();
    passenger.address = req.address.into_inner();

    state
        .passenger_repo
        .update(&passenger)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(ProfileResponse::from(passenger)))
}

/// Fetch the passenger record behind the authenticated subject, creating a
/// bare profile on first contact.
pub async fn current_passenger(
    state: &AppState,
    claims: &CustomerClaims,
) -> Result<Passenger, AppError> {
    if let Some(passenger) = state
        .passenger_repo
        .get_by_subject(&claims.sub)
        .await
        .map_err(AppError::internal)?
    {
        return Ok(passenger);
    }

    let passenger = Passenger::new(
        claims.sub.clone(),
        claims.sub.clone(),
        claims.email.clone().unwrap_or_default(),
    );
    state
        .passenger_repo
        .create(&passenger)
        .await
        .map_err(AppError::internal)?;

    Ok(passenger)
}
