use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use waveline_catalog::{
    ensure_no_assignment_conflict, Ferry, FerryAssignment, Port, Route, Schedule, Staff,
};

use crate::error::AppError;
use crate::middleware::auth::StaffClaims;
use crate::state::AppState;
use crate::tickets::TicketResponse;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FerryRequest {
    pub name: String,
    pub model: String,
    pub registration_number: String,
    pub capacity: i32,
}

#[derive(Debug, Deserialize)]
pub struct PortRequest {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    pub name: String,
    pub departure_port_id: Uuid,
    pub arrival_port_id: Uuid,
    pub distance_nm: f64,
}

#[derive(Debug, Deserialize)]
pub struct StaffRequest {
    pub subject: String,
    pub name: String,
    pub position: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub ferry_id: Uuid,
    pub route_id: Uuid,
    pub departure_time: chrono::DateTime<chrono::Utc>,
    pub arrival_time: chrono::DateTime<chrono::Utc>,
    pub price_cents: i64,
    #[serde(default)]
    pub reserve: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub ferry_id: Uuid,
    pub schedule_id: Uuid,
    pub staff_id: Uuid,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/ferries", post(create_ferry).get(list_ferries))
        .route(
            "/v1/admin/ferries/{id}",
            get(get_ferry).put(update_ferry).delete(delete_ferry),
        )
        .route("/v1/admin/ports", post(create_port).get(list_ports))
        .route("/v1/admin/ports/{id}", get(get_port))
        .route("/v1/admin/routes", post(create_route).get(list_routes))
        .route("/v1/admin/routes/{id}", get(get_route))
        .route("/v1/admin/staff", post(create_staff).get(list_staff))
        .route("/v1/admin/schedules", post(create_schedule))
        .route(
            "/v1/admin/schedules/{id}",
            get(get_schedule).put(update_schedule).delete(delete_schedule),
        )
        .route(
            "/v1/admin/assignments",
            post(create_assignment).get(list_assignments),
        )
        .route("/v1/admin/assignments/{id}", delete(delete_assignment))
        .route("/v1/admin/tickets/{id}/board", post(board_ticket))
}

// ============================================================================
// Fleet
// ============================================================================

/// POST /v1/admin/ferries
async fn create_ferry(
    State(state): State<AppState>,
    Json(req): Json<FerryRequest>,
) -> Result<Json<Ferry>, AppError> {
    let ferry = Ferry::new(req.name, req.model, req.registration_number, req.capacity)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .catalog_repo
        .create_ferry(&ferry)
        .await
        .map_err(AppError::internal)?;

    info!(ferry_id = %ferry.id, registration = %ferry.registration_number, "ferry registered");
    Ok(Json(ferry))
}

/// GET /v1/admin/ferries
async fn list_ferries(State(state): State<AppState>) -> Result<Json<Vec<Ferry>>, AppError> {
    let ferries = state
        .catalog_repo
        .list_ferries()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(ferries))
}

/// GET /v1/admin/ferries/:id
async fn get_ferry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Ferry>, AppError> {
    let ferry = state
        .catalog_repo
        .get_ferry(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Ferry not found: {}", id)))?;
    Ok(Json(ferry))
}

/// PUT /v1/admin/ferries/:id
async fn update_ferry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<FerryRequest>,
) -> Result<Json<Ferry>, AppError> {
    state
        .catalog_repo
        .get_ferry(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Ferry not found: {}", id)))?;

    let mut ferry = Ferry::new(req.name, req.model, req.registration_number, req.capacity)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    ferry.id = id;

    state
        .catalog_repo
        .update_ferry(&ferry)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(ferry))
}

/// DELETE /v1/admin/ferries/:id
async fn delete_ferry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .catalog_repo
        .delete_ferry(id)
        .await
        .map_err(AppError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Ports & Routes
// ============================================================================

/// POST /v1/admin/ports
async fn create_port(
    State(state): State<AppState>,
    Json(req): Json<PortRequest>,
) -> Result<Json<Port>, AppError> {
    let port = Port::new(req.name, req.location);
    state
        .catalog_repo
        .create_port(&port)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(port))
}

/// GET /v1/admin/ports
async fn list_ports(State(state): State<AppState>) -> Result<Json<Vec<Port>>, AppError> {
    let ports = state
        .catalog_repo
        .list_ports()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(ports))
}

/// GET /v1/admin/ports/:id
async fn get_port(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Port>, AppError> {
    let port = state
        .catalog_repo
        .get_port(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Port not found: {}", id)))?;
    Ok(Json(port))
}

/// POST /v1/admin/routes
async fn create_route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<Route>, AppError> {
    for port_id in [req.departure_port_id, req.arrival_port_id] {
        state
            .catalog_repo
            .get_port(port_id)
            .await
            .map_err(AppError::internal)?
            .ok_or_else(|| AppError::ValidationError(format!("Port not found: {}", port_id)))?;
    }

    let route = Route::new(
        req.name,
        req.departure_port_id,
        req.arrival_port_id,
        req.distance_nm,
    )
    .map_err(|e| AppError::ValidationError(e.to_string()))?;

    state
        .catalog_repo
        .create_route(&route)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(route))
}

/// GET /v1/admin/routes
async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>, AppError> {
    let routes = state
        .catalog_repo
        .list_routes()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(routes))
}

/// GET /v1/admin/routes/:id
async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Route>, AppError> {
    let route = state
        .catalog_repo
        .get_route(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Route not found: {}", id)))?;
    Ok(Json(route))
}

// ============================================================================
// Crew
// ============================================================================

/// POST /v1/admin/staff
async fn create_staff(
    State(state): State<AppState>,
    Json(req): Json<StaffRequest>,
) -> Result<Json<Staff>, AppError> {
    let mut staff = Staff::new(req.subject, req.name, req.position);
    staff.contact_number = req.contact_number;
    staff.email = req.email;

    state
        .catalog_repo
        .create_staff(&staff)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(staff))
}

/// GET /v1/admin/staff
async fn list_staff(State(state): State<AppState>) -> Result<Json<Vec<Staff>>, AppError> {
    let staff = state
        .catalog_repo
        .list_staff()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(staff))
}

// ============================================================================
// Schedules
// ============================================================================

/// POST /v1/admin/schedules
/// Publishing a sailing validates the window and rejects any overlap with
/// the ferry's existing sailings.
async fn create_schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = build_validated_schedule(&state, None, req).await?;

    state
        .schedule_repo
        .create_schedule(&schedule)
        .await
        .map_err(AppError::internal)?;

    info!(schedule_id = %schedule.id, ferry_id = %schedule.ferry_id, "sailing published");
    Ok(Json(schedule))
}

/// GET /v1/admin/schedules/:id
async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = state
        .schedule_repo
        .get_schedule(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Schedule not found: {}", id)))?;
    Ok(Json(schedule))
}

/// PUT /v1/admin/schedules/:id
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    state
        .schedule_repo
        .get_schedule(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Schedule not found: {}", id)))?;

    let schedule = build_validated_schedule(&state, Some(id), req).await?;

    state
        .schedule_repo
        .update_schedule(&schedule)
        .await
        .map_err(AppError::internal)?;
    Ok(Json(schedule))
}

/// DELETE /v1/admin/schedules/:id
async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .schedule_repo
        .delete_schedule(id)
        .await
        .map_err(AppError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve references, run the window checks, and return a sailing ready
/// to persist. `existing_id` keeps an update from colliding with itself.
async fn build_validated_schedule(
    state: &AppState,
    existing_id: Option<Uuid>,
    req: ScheduleRequest,
) -> Result<Schedule, AppError> {
    state
        .catalog_repo
        .get_ferry(req.ferry_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::ValidationError(format!("Ferry not found: {}", req.ferry_id)))?;
    state
        .catalog_repo
        .get_route(req.route_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::ValidationError(format!("Route not found: {}", req.route_id)))?;

    let mut schedule = Schedule::new(
        req.ferry_id,
        req.route_id,
        req.departure_time,
        req.arrival_time,
        req.price_cents,
        req.reserve,
    )
    .map_err(|e| AppError::ValidationError(e.to_string()))?;
    if let Some(id) = existing_id {
        schedule.id = id;
    }

    let existing = state
        .schedule_repo
        .list_for_ferry(schedule.ferry_id)
        .await
        .map_err(AppError::internal)?;
    schedule
        .ensure_no_ferry_conflict(&existing)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;

    Ok(schedule)
}

// ============================================================================
// Assignments
// ============================================================================

/// POST /v1/admin/assignments
/// Put a crew member on a ferry for one sailing. A ferry cannot be assigned
/// to two sailings whose windows overlap.
async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<AssignmentRequest>,
) -> Result<Json<FerryAssignment>, AppError> {
    state
        .catalog_repo
        .get_ferry(req.ferry_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::ValidationError(format!("Ferry not found: {}", req.ferry_id)))?;
    state
        .catalog_repo
        .get_staff(req.staff_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::ValidationError(format!("Staff not found: {}", req.staff_id)))?;
    let schedule = state
        .schedule_repo
        .get_schedule(req.schedule_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| {
            AppError::ValidationError(format!("Schedule not found: {}", req.schedule_id))
        })?;

    let assignment = FerryAssignment::new(req.ferry_id, req.schedule_id, req.staff_id);

    let windows = state
        .assignment_repo
        .windows_for_ferry(assignment.ferry_id)
        .await
        .map_err(AppError::internal)?;
    ensure_no_assignment_conflict(&assignment, &schedule, &windows)
        .map_err(|e| AppError::ConflictError(e.to_string()))?;

    state
        .assignment_repo
        .create(&assignment)
        .await
        .map_err(AppError::internal)?;

    info!(
        assignment_id = %assignment.id,
        ferry_id = %assignment.ferry_id,
        staff_id = %assignment.staff_id,
        "ferry assignment created"
    );
    Ok(Json(assignment))
}

/// GET /v1/admin/assignments
async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<FerryAssignment>>, AppError> {
    let assignments = state
        .assignment_repo
        .list()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(assignments))
}

/// DELETE /v1/admin/assignments/:id
async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .assignment_repo
        .get(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Assignment not found: {}", id)))?;

    state
        .assignment_repo
        .delete(id)
        .await
        .map_err(AppError::internal)?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Boarding
// ============================================================================

/// POST /v1/admin/tickets/:id/board
/// Mark a paid, active ticket as used at the gangway.
async fn board_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<StaffClaims>,
    Path(ticket_id): Path<Uuid>,
) -> Result<Json<TicketResponse>, AppError> {
    let mut ticket = state
        .ticket_repo
        .get(ticket_id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::NotFoundError(format!("Ticket not found: {}", ticket_id)))?;

    ticket
        .mark_used()
        .map_err(|e| AppError::ConflictError(e.to_string()))?;
    state
        .ticket_repo
        .update(&ticket)
        .await
        .map_err(AppError::internal)?;

    info!(ticket_id = %ticket.id, boarded_by = %claims.sub, "passenger boarded");
    Ok(Json(TicketResponse::from(&ticket)))
}
