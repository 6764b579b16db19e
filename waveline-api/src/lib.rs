use axum::http::Method;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod passengers;
pub mod reservations;
pub mod schedules;
pub mod state;
pub mod tickets;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let public = Router::new()
        .merge(auth::routes())
        .merge(schedules::routes());

    let customer = Router::new()
        .merge(passengers::routes())
        .merge(tickets::routes())
        .merge(reservations::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::customer_auth_middleware,
        ));

    let staff = admin::routes().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::staff_auth_middleware,
    ));

    Router::new()
        .merge(public)
        .merge(customer)
        .merge(staff)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
