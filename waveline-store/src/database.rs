use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres, Row};
use std::time::Duration;
use tracing::info;
use serde_json::Value;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    /// Pool that only connects on first use. Integration tests build the
    /// router around this without a live database.
    pub fn new_lazy(connection_string: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(connection_string)?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Overlay single-rule overrides from the booking_rules table onto the
    /// configured defaults. Row format: rule_key, {"value": <number>}.
    pub async fn fetch_booking_rules(
        &self,
        defaults: crate::app_config::BookingRules,
    ) -> Result<crate::app_config::BookingRules, sqlx::Error> {
        let rows = sqlx::query("SELECT rule_key, rule_value FROM booking_rules")
            .fetch_all(&self.pool)
            .await?;

        let mut rules = defaults;

        for row in rows {
            let rule_key: String = row.get("rule_key");
            let rule_value: Value = row.get("rule_value");

            if let Some(v) = rule_value.get("value") {
                match rule_key.as_str() {
                    "reservation_lead_hours" => {
                        if let Some(i) = v.as_i64() {
                            rules.reservation_lead_hours = i;
                        }
                    }
                    "ticket_cancel_cutoff_hours" => {
                        if let Some(i) = v.as_i64() {
                            rules.ticket_cancel_cutoff_hours = i;
                        }
                    }
                    "reservation_cancel_cutoff_hours" => {
                        if let Some(i) = v.as_i64() {
                            rules.reservation_cancel_cutoff_hours = i;
                        }
                    }
                    "pending_ttl_hours" => {
                        if let Some(i) = v.as_i64() {
                            rules.pending_ttl_hours = i;
                        }
                    }
                    "default_deposit_percent" => {
                        if let Some(u) = v.as_u64() {
                            rules.default_deposit_percent = u as u8;
                        }
                    }
                    "expiry_sweep_seconds" => {
                        if let Some(u) = v.as_u64() {
                            rules.expiry_sweep_seconds = u;
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(rules)
    }
}
