use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use waveline_catalog::Schedule;
use waveline_core::repository::SailingFilter;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub departure_port: Option<Uuid>,
    pub arrival_port: Option<Uuid>,
    /// YYYY-MM-DD; silently ignored when malformed.
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SailingResponse {
    pub id: Uuid,
    pub ferry_id: Uuid,
    pub route_id: Uuid,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price_cents: i64,
    pub reserve: bool,
}

impl From<Schedule> for SailingResponse {
    fn from(schedule: Schedule) -> Self {
        Self {
            id: schedule.id,
            ferry_id: schedule.ferry_id,
            route_id: schedule.route_id,
            departure_time: schedule.departure_time,
            arrival_time: schedule.arrival_time,
            price_cents: schedule.price_cents,
            reserve: schedule.reserve,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/schedules", get(list_schedules))
}

/// GET /v1/schedules
/// Upcoming sailings, optionally filtered by port pair and departure date.
async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<SailingResponse>>, AppError> {
    let filter = SailingFilter {
        departure_port_id: query.departure_port,
        arrival_port_id: query.arrival_port,
        departure_date: query
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
    };

    let schedules = state
        .schedule_repo
        .list_upcoming(Utc::now(), &filter)
        .await
        .map_err(AppError::internal)?;

    Ok(Json(
        schedules.into_iter().map(SailingResponse::from).collect(),
    ))
}
