use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use waveline_booking::{Ticket, TicketPaymentStatus, TicketStatus};
use waveline_core::repository::TicketRepository;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: Uuid,
    schedule_id: Uuid,
    passenger_id: Uuid,
    purchase_date: DateTime<Utc>,
    seat_number: String,
    status: String,
    payment_status: String,
}

impl TicketRow {
    fn into_ticket(self) -> Result<Ticket, RepoError> {
        Ok(Ticket {
            id: self.id,
            schedule_id: self.schedule_id,
            passenger_id: self.passenger_id,
            purchase_date: self.purchase_date,
            seat_number: self.seat_number,
            status: self.status.parse::<TicketStatus>()?,
            payment_status: self.payment_status.parse::<TicketPaymentStatus>()?,
        })
    }
}

const TICKET_COLUMNS: &str =
    "id, schedule_id, passenger_id, purchase_date, seat_number, status, payment_status";

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn create(&self, ticket: &Ticket) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (id, schedule_id, passenger_id, purchase_date, seat_number, status, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(ticket.id)
        .bind(ticket.schedule_id)
        .bind(ticket.passenger_id)
        .bind(ticket.purchase_date)
        .bind(&ticket.seat_number)
        .bind(ticket.status.as_str())
        .bind(ticket.payment_status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Ticket>, RepoError> {
        let row = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE id = $1",
            TICKET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(TicketRow::into_ticket).transpose()
    }

    async fn update(&self, ticket: &Ticket) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE tickets
            SET seat_number = $1, status = $2, payment_status = $3
            WHERE id = $4
            "#,
        )
        .bind(&ticket.seat_number)
        .bind(ticket.status.as_str())
        .bind(ticket.payment_status.as_str())
        .bind(ticket.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_passenger(&self, passenger_id: Uuid) -> Result<Vec<Ticket>, RepoError> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE passenger_id = $1 ORDER BY purchase_date DESC",
            TICKET_COLUMNS
        ))
        .bind(passenger_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(TicketRow::into_ticket).collect()
    }

    async fn count_active(&self, schedule_id: Uuid) -> Result<i64, RepoError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tickets WHERE schedule_id = $1 AND status = 'ACTIVE'",
        )
        .bind(schedule_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    async fn active_seats(&self, schedule_id: Uuid) -> Result<Vec<String>, RepoError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT seat_number FROM tickets WHERE schedule_id = $1 AND status = 'ACTIVE'",
        )
        .bind(schedule_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(seat,)| seat).collect())
    }
}
