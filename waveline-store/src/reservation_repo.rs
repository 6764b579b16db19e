use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use waveline_booking::{Reservation, ReservationStatus};
use waveline_core::repository::ReservationRepository;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    schedule_id: Uuid,
    passenger_id: Uuid,
    reserved_at: DateTime<Utc>,
    status: String,
}

impl ReservationRow {
    fn into_reservation(self) -> Result<Reservation, RepoError> {
        Ok(Reservation {
            id: self.id,
            schedule_id: self.schedule_id,
            passenger_id: self.passenger_id,
            reserved_at: self.reserved_at,
            status: self.status.parse::<ReservationStatus>()?,
        })
    }
}

const RESERVATION_COLUMNS: &str = "id, schedule_id, passenger_id, reserved_at, status";

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn create(&self, reservation: &Reservation) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO reservations (id, schedule_id, passenger_id, reserved_at, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(reservation.id)
        .bind(reservation.schedule_id)
        .bind(reservation.passenger_id)
        .bind(reservation.reserved_at)
        .bind(reservation.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Reservation>, RepoError> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {} FROM reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ReservationRow::into_reservation).transpose()
    }

    async fn update(&self, reservation: &Reservation) -> Result<(), RepoError> {
        sqlx::query("UPDATE reservations SET status = $1 WHERE id = $2")
            .bind(reservation.status.as_str())
            .bind(reservation.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_for_passenger(
        &self,
        passenger_id: Uuid,
    ) -> Result<Vec<Reservation>, RepoError> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            "SELECT {} FROM reservations WHERE passenger_id = $1 ORDER BY reserved_at DESC",
            RESERVATION_COLUMNS
        ))
        .bind(passenger_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(ReservationRow::into_reservation)
            .collect()
    }

    async fn count_held(&self, schedule_id: Uuid) -> Result<i64, RepoError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM reservations WHERE schedule_id = $1 AND status IN ('PENDING', 'CONFIRMED')",
        )
        .bind(schedule_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    async fn expire_pending(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<(Uuid, Uuid)>, RepoError> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            UPDATE reservations
            SET status = 'CANCELLED'
            WHERE status = 'PENDING' AND reserved_at < $1
            RETURNING id, schedule_id
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
