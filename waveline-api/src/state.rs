use std::sync::Arc;

use waveline_booking::BookingPolicy;
use waveline_core::payment::{PaymentGateway, SimulatedGateway};
use waveline_core::repository::{
    AssignmentRepository, CatalogRepository, PassengerRepository, PaymentRepository,
    ReservationRepository, ScheduleRepository, TicketRepository,
};
use waveline_store::{
    DbClient, PostgresAssignmentRepository, PostgresCatalogRepository,
    PostgresPassengerRepository, PostgresPaymentRepository, PostgresReservationRepository,
    PostgresScheduleRepository, PostgresTicketRepository,
};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbClient>,
    pub catalog_repo: Arc<dyn CatalogRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub passenger_repo: Arc<dyn PassengerRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub payment_repo: Arc<dyn PaymentRepository>,
    pub assignment_repo: Arc<dyn AssignmentRepository>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub policy: BookingPolicy,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wire every repository onto the shared pool, with the simulated
    /// payment gateway.
    pub fn new(db: Arc<DbClient>, policy: BookingPolicy, auth: AuthConfig) -> Self {
        let pool = db.pool.clone();
        Self {
            db,
            catalog_repo: Arc::new(PostgresCatalogRepository::new(pool.clone())),
            schedule_repo: Arc::new(PostgresScheduleRepository::new(pool.clone())),
            passenger_repo: Arc::new(PostgresPassengerRepository::new(pool.clone())),
            ticket_repo: Arc::new(PostgresTicketRepository::new(pool.clone())),
            reservation_repo: Arc::new(PostgresReservationRepository::new(pool.clone())),
            payment_repo: Arc::new(PostgresPaymentRepository::new(pool.clone())),
            assignment_repo: Arc::new(PostgresAssignmentRepository::new(pool)),
            gateway: Arc::new(SimulatedGateway),
            policy,
            auth,
        }
    }
}
