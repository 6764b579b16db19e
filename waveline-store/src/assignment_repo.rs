use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use waveline_catalog::{AssignedWindow, FerryAssignment};
use waveline_core::repository::AssignmentRepository;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresAssignmentRepository {
    pool: PgPool,
}

impl PostgresAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: Uuid,
    ferry_id: Uuid,
    schedule_id: Uuid,
    staff_id: Uuid,
    assigned_at: DateTime<Utc>,
}

impl From<AssignmentRow> for FerryAssignment {
    fn from(row: AssignmentRow) -> Self {
        FerryAssignment {
            id: row.id,
            ferry_id: row.ferry_id,
            schedule_id: row.schedule_id,
            staff_id: row.staff_id,
            assigned_at: row.assigned_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WindowRow {
    assignment_id: Uuid,
    departure_time: DateTime<Utc>,
    arrival_time: DateTime<Utc>,
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepository {
    async fn create(&self, assignment: &FerryAssignment) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO ferry_assignments (id, ferry_id, schedule_id, staff_id, assigned_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.ferry_id)
        .bind(assignment.schedule_id)
        .bind(assignment.staff_id)
        .bind(assignment.assigned_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<FerryAssignment>, RepoError> {
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT id, ferry_id, schedule_id, staff_id, assigned_at FROM ferry_assignments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(FerryAssignment::from))
    }

    async fn list(&self) -> Result<Vec<FerryAssignment>, RepoError> {
        let rows = sqlx::query_as::<_, AssignmentRow>(
            "SELECT id, ferry_id, schedule_id, staff_id, assigned_at FROM ferry_assignments ORDER BY assigned_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(FerryAssignment::from).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM ferry_assignments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn windows_for_ferry(&self, ferry_id: Uuid) -> Result<Vec<AssignedWindow>, RepoError> {
        let rows = sqlx::query_as::<_, WindowRow>(
            r#"
            SELECT a.id AS assignment_id, s.departure_time, s.arrival_time
            FROM ferry_assignments a
            JOIN schedules s ON a.schedule_id = s.id
            WHERE a.ferry_id = $1
            "#,
        )
        .bind(ferry_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(|row| AssignedWindow {
                assignment_id: row.assignment_id,
                departure_time: row.departure_time,
                arrival_time: row.arrival_time,
            })
            .collect())
    }
}
