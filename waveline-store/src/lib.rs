pub mod app_config;
pub mod assignment_repo;
pub mod catalog_repo;
pub mod database;
pub mod passenger_repo;
pub mod payment_repo;
pub mod reservation_repo;
pub mod schedule_repo;
pub mod ticket_repo;

pub use assignment_repo::PostgresAssignmentRepository;
pub use catalog_repo::PostgresCatalogRepository;
pub use database::DbClient;
pub use passenger_repo::PostgresPassengerRepository;
pub use payment_repo::PostgresPaymentRepository;
pub use reservation_repo::PostgresReservationRepository;
pub use schedule_repo::PostgresScheduleRepository;
pub use ticket_repo::PostgresTicketRepository;
