use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use waveline_shared::events::ReservationExpiredEvent;

use crate::state::AppState;

/// Background sweep that cancels PENDING reservations which outlived their
/// deposit window, releasing the seats they held. Handlers also expire
/// stale reservations on access; this catches the ones nobody touches.
pub async fn start_expiry_worker(state: AppState, sweep_every: Duration) {
    info!(
        interval_seconds = sweep_every.as_secs(),
        "Reservation expiry worker started"
    );

    let mut ticker = tokio::time::interval(sweep_every);
    loop {
        ticker.tick().await;

        let now = Utc::now();
        let cutoff = now - state.policy.pending_ttl;
        match state.reservation_repo.expire_pending(cutoff).await {
            Ok(expired) => {
                for (reservation_id, schedule_id) in expired {
                    let event = ReservationExpiredEvent {
                        reservation_id,
                        schedule_id,
                        timestamp: now.timestamp(),
                    };
                    info!(event = ?event, "reservation expired");
                }
            }
            Err(e) => error!("Expiry sweep failed: {}", e),
        }
    }
}
