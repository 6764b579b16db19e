use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use waveline_booking::{BookingError, Payment, PaymentMethod, PaymentStatus, PaymentTarget};
use waveline_core::repository::PaymentRepository;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    ticket_id: Option<Uuid>,
    reservation_id: Option<Uuid>,
    amount_cents: i64,
    method: String,
    status: String,
    transaction_reference: Option<String>,
    payment_date: DateTime<Utc>,
}

impl PaymentRow {
    fn into_payment(self) -> Result<Payment, RepoError> {
        // The table enforces exactly-one-target with a CHECK constraint;
        // reject anything that slips past it instead of guessing.
        let target = match (self.ticket_id, self.reservation_id) {
            (Some(ticket_id), None) => PaymentTarget::Ticket(ticket_id),
            (None, Some(reservation_id)) => PaymentTarget::Reservation(reservation_id),
            _ => {
                return Err(Box::new(BookingError::UnknownStatus {
                    entity: "PaymentTarget",
                    value: format!("payment {} has no single target", self.id),
                }))
            }
        };
        Ok(Payment {
            id: self.id,
            target,
            amount_cents: self.amount_cents,
            method: self.method.parse::<PaymentMethod>()?,
            status: self.status.parse::<PaymentStatus>()?,
            transaction_reference: self.transaction_reference.unwrap_or_default(),
            payment_date: self.payment_date,
        })
    }
}

const PAYMENT_COLUMNS: &str =
    "id, ticket_id, reservation_id, amount_cents, method, status, transaction_reference, payment_date";

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), RepoError> {
        let (ticket_id, reservation_id) = match payment.target {
            PaymentTarget::Ticket(id) => (Some(id), None),
            PaymentTarget::Reservation(id) => (None, Some(id)),
        };

        sqlx::query(
            r#"
            INSERT INTO payments (id, ticket_id, reservation_id, amount_cents, method, status, transaction_reference, payment_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(payment.id)
        .bind(ticket_id)
        .bind(reservation_id)
        .bind(payment.amount_cents)
        .bind(payment.method.as_str())
        .bind(payment.status.as_str())
        .bind(&payment.transaction_reference)
        .bind(payment.payment_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_for_target(&self, target: PaymentTarget) -> Result<Vec<Payment>, RepoError> {
        let rows = match target {
            PaymentTarget::Ticket(id) => {
                sqlx::query_as::<_, PaymentRow>(&format!(
                    "SELECT {} FROM payments WHERE ticket_id = $1 ORDER BY payment_date",
                    PAYMENT_COLUMNS
                ))
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            PaymentTarget::Reservation(id) => {
                sqlx::query_as::<_, PaymentRow>(&format!(
                    "SELECT {} FROM payments WHERE reservation_id = $1 ORDER BY payment_date",
                    PAYMENT_COLUMNS
                ))
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        rows.into_iter().map(PaymentRow::into_payment).collect()
    }
}
