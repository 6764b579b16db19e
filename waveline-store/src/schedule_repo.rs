use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use waveline_catalog::Schedule;
use waveline_core::repository::{SailingFilter, ScheduleRepository};

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresScheduleRepository {
    pool: PgPool,
}

impl PostgresScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    ferry_id: Uuid,
    route_id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
    price_cents: i64,
    reserve: bool,
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        Schedule {
            id: row.id,
            ferry_id: row.ferry_id,
            route_id: row.route_id,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price_cents: row.price_cents,
            reserve: row.reserve,
        }
    }
}

const SCHEDULE_COLUMNS: &str =
    "s.id, s.ferry_id, s.route_id, s.departure_time, s.arrival_time, s.price_cents, s.reserve";

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepository {
    async fn create_schedule(&self, schedule: &Schedule) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO schedules (id, ferry_id, route_id, departure_time, arrival_time, price_cents, reserve)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(schedule.id)
        .bind(schedule.ferry_id)
        .bind(schedule.route_id)
        .bind(schedule.departure_time)
        .bind(schedule.arrival_time)
        .bind(schedule.price_cents)
        .bind(schedule.reserve)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_schedule(&self, id: Uuid) -> Result<Option<Schedule>, RepoError> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM schedules s WHERE s.id = $1",
            SCHEDULE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Schedule::from))
    }

    async fn list_upcoming(
        &self,
        now: DateTime<Utc>,
        filter: &SailingFilter,
    ) -> Result<Vec<Schedule>, RepoError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"
            SELECT {}
            FROM schedules s
            JOIN routes r ON s.route_id = r.id
            WHERE s.departure_time > $1
              AND ($2::uuid IS NULL OR r.departure_port_id = $2)
              AND ($3::uuid IS NULL OR r.arrival_port_id = $3)
              AND ($4::date IS NULL OR (s.departure_time AT TIME ZONE 'UTC')::date = $4)
            ORDER BY s.departure_time
            "#,
            SCHEDULE_COLUMNS
        ))
        .bind(now)
        .bind(filter.departure_port_id)
        .bind(filter.arrival_port_id)
        .bind(filter.departure_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Schedule::from).collect())
    }

    async fn list_for_ferry(&self, ferry_id: Uuid) -> Result<Vec<Schedule>, RepoError> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM schedules s WHERE s.ferry_id = $1 ORDER BY s.departure_time",
            SCHEDULE_COLUMNS
        ))
        .bind(ferry_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Schedule::from).collect())
    }

    async fn update_schedule(&self, schedule: &Schedule) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE schedules
            SET ferry_id = $1, route_id = $2, departure_time = $3, arrival_time = $4,
                price_cents = $5, reserve = $6
            WHERE id = $7
            "#,
        )
        .bind(schedule.ferry_id)
        .bind(schedule.route_id)
        .bind(schedule.departure_time)
        .bind(schedule.arrival_time)
        .bind(schedule.price_cents)
        .bind(schedule.reserve)
        .bind(schedule.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_schedule(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
