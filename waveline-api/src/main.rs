use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waveline_api::state::{AppState, AuthConfig};
use waveline_api::{app, worker};
use waveline_booking::BookingPolicy;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "waveline_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = waveline_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Waveline API on port {}", config.server.port);

    let db = waveline_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    // Operators can override single booking rules in the database without
    // a redeploy.
    let rules = match db.fetch_booking_rules(config.booking_rules.clone()).await {
        Ok(rules) => rules,
        Err(e) => {
            tracing::warn!(
                "Could not read booking_rules overrides, using configured defaults: {}",
                e
            );
            config.booking_rules.clone()
        }
    };

    let policy = BookingPolicy::from_hours(
        rules.reservation_lead_hours,
        rules.ticket_cancel_cutoff_hours,
        rules.reservation_cancel_cutoff_hours,
        rules.pending_ttl_hours,
        rules.default_deposit_percent,
    );

    let state = AppState::new(
        Arc::new(db),
        policy,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    tokio::spawn(worker::start_expiry_worker(
        state.clone(),
        Duration::from_secs(rules.expiry_sweep_seconds),
    ));

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
