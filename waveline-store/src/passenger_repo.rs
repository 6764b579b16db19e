use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use waveline_booking::Passenger;
use waveline_core::repository::PassengerRepository;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresPassengerRepository {
    pool: PgPool,
}

impl PostgresPassengerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PassengerRow {
    id: Uuid,
    subject: String,
    full_name: String,
    email: String,
    contact_number: String,
    address: String,
}

impl From<PassengerRow> for Passenger {
    fn from(row: PassengerRow) -> Self {
        Passenger {
            id: row.id,
            subject: row.subject,
            full_name: row.full_name,
            email: row.email,
            contact_number: row.contact_number,
            address: row.address,
        }
    }
}

#[async_trait]
impl PassengerRepository for PostgresPassengerRepository {
    async fn get_by_subject(&self, subject: &str) -> Result<Option<Passenger>, RepoError> {
        let row = sqlx::query_as::<_, PassengerRow>(
            "SELECT id, subject, full_name, email, contact_number, address FROM passengers WHERE subject = $1",
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Passenger::from))
    }

    async fn create(&self, passenger: &Passenger) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO passengers (id, subject, full_name, email, contact_number, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(passenger.id)
        .bind(&passenger.subject)
        .bind(&passenger.full_name)
        .bind(&passenger.email)
        .bind(&passenger.contact_number)
        .bind(&passenger.address)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, passenger: &Passenger) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE passengers
            SET full_name = $1, email = $2, contact_number = $3, address = $4
            WHERE id = $5
            "#,
        )
        .bind(&passenger.full_name)
        .bind(&passenger.email)
        .bind(&passenger.contact_number)
        .bind(&passenger.address)
        .bind(passenger.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
