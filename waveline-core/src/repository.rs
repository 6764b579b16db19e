use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use waveline_booking::{Passenger, Payment, PaymentTarget, Reservation, Ticket};
use waveline_catalog::{AssignedWindow, Ferry, FerryAssignment, Port, Route, Schedule, Staff};

type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for fleet and route reference data
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_ferry(&self, ferry: &Ferry) -> Result<(), RepoError>;
    async fn get_ferry(&self, id: Uuid) -> Result<Option<Ferry>, RepoError>;
    async fn list_ferries(&self) -> Result<Vec<Ferry>, RepoError>;
    async fn update_ferry(&self, ferry: &Ferry) -> Result<(), RepoError>;
    async fn delete_ferry(&self, id: Uuid) -> Result<(), RepoError>;

    async fn create_port(&self, port: &Port) -> Result<(), RepoError>;
    async fn get_port(&self, id: Uuid) -> Result<Option<Port>, RepoError>;
    async fn list_ports(&self) -> Result<Vec<Port>, RepoError>;

    async fn create_route(&self, route: &Route) -> Result<(), RepoError>;
    async fn get_route(&self, id: Uuid) -> Result<Option<Route>, RepoError>;
    async fn list_routes(&self) -> Result<Vec<Route>, RepoError>;

    async fn create_staff(&self, staff: &Staff) -> Result<(), RepoError>;
    async fn get_staff(&self, id: Uuid) -> Result<Option<Staff>, RepoError>;
    async fn list_staff(&self) -> Result<Vec<Staff>, RepoError>;
}

/// Filters for the public sailing search.
#[derive(Debug, Default, Clone)]
pub struct SailingFilter {
    pub departure_port_id: Option<Uuid>,
    pub arrival_port_id: Option<Uuid>,
    pub departure_date: Option<NaiveDate>,
}

/// Repository trait for sailing schedules
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn create_schedule(&self, schedule: &Schedule) -> Result<(), RepoError>;
    async fn get_schedule(&self, id: Uuid) -> Result<Option<Schedule>, RepoError>;
    /// Upcoming sailings (departure after `now`), optionally filtered,
    /// ordered by departure time.
    async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
        filter: &SailingFilter,
    ) -> Result<Vec<Schedule>, RepoError>;
    /// All sailings of one ferry, for overlap validation.
    async fn list_for_ferry(&self, ferry_id: Uuid) -> Result<Vec<Schedule>, RepoError>;
    async fn update_schedule(&self, schedule: &Schedule) -> Result<(), RepoError>;
    async fn delete_schedule(&self, id: Uuid) -> Result<(), RepoError>;
}

/// Repository trait for passenger records
#[async_trait]
pub trait PassengerRepository: Send + Sync {
    async fn get_by_subject(&self, subject: &str) -> Result<Option<Passenger>, RepoError>;
    async fn create(&self, passenger: &Passenger) -> Result<(), RepoError>;
    async fn update(&self, passenger: &Passenger) -> Result<(), RepoError>;
}

/// Repository trait for tickets
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn create(&self, ticket: &Ticket) -> Result<(), RepoError>;
    async fn get(&self, id: Uuid) -> Result<Option<Ticket>, RepoError>;
    async fn update(&self, ticket: &Ticket) -> Result<(), RepoError>;
    async fn list_for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Ticket>, RepoError>;
    /// Number of ACTIVE tickets on a sailing.
    async fn count_active(&self, schedule_id: Uuid) -> Result<i64, RepoError>;
    /// Seat labels of ACTIVE tickets on a sailing.
    async fn active_seats(&self, schedule_id: Uuid) -> Result<Vec<String>, RepoError>;
}

/// Repository trait for reservations
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn create(&self, reservation: &Reservation) -> Result<(), RepoError>;
    async fn get(&self, id: Uuid) -> Result<Option<Reservation>, RepoError>;
    async fn update(&self, reservation: &Reservation) -> Result<(), RepoError>;
    async fn list_for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Reservation>, RepoError>;
    /// Number of PENDING or CONFIRMED reservations holding seats on a sailing.
    async fn count_held(&self, schedule_id: Uuid) -> Result<i64, RepoError>;
    /// Cancel every PENDING reservation created before `cutoff`, returning
    /// the affected (reservation, schedule) id pairs.
    async fn expire_pending(&self, cutoff: DateTime<Utc>) -> Result<Vec<(Uuid, Uuid)>, RepoError>;
}

/// Repository trait for payment records
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: &Payment) -> Result<(), RepoError>;
    /// Payments recorded against one ticket or reservation, oldest first.
    async fn list_for_target(&self, target: PaymentTarget) -> Result<Vec<Payment>, RepoError>;
}

/// Repository trait for ferry duty assignments
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn create(&self, assignment: &FerryAssignment) -> Result<(), RepoError>;
    async fn get(&self, id: Uuid) -> Result<Option<FerryAssignment>, RepoError>;
    async fn list(&self) -> Result<Vec<FerryAssignment>, RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
    /// Sailing windows already claimed by a ferry's assignments.
    async fn windows_for_ferry(&self, ferry_id: Uuid) -> Result<Vec<AssignedWindow>, RepoError>;
}
