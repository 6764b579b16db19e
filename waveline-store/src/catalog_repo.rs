use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use waveline_catalog::{Ferry, Port, Route, Staff};
use waveline_core::repository::CatalogRepository;

type RepoError = Box<dyn std::error::Error + Send + Sync>;

pub struct PostgresCatalogRepository {
    pool: PgPool,
}

impl PostgresCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct FerryRow {
    id: Uuid,
    name: String,
    model: String,
    registration_number: String,
    capacity: i32,
}

impl From<FerryRow> for Ferry {
    fn from(row: FerryRow) -> Self {
        Ferry {
            id: row.id,
            name: row.name,
            model: row.model,
            registration_number: row.registration_number,
            capacity: row.capacity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PortRow {
    id: Uuid,
    name: String,
    location: String,
}

impl From<PortRow> for Port {
    fn from(row: PortRow) -> Self {
        Port {
            id: row.id,
            name: row.name,
            location: row.location,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: Uuid,
    name: String,
    departure_port_id: Uuid,
    arrival_port_id: Uuid,
    distance_nm: f64,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Route {
            id: row.id,
            name: row.name,
            departure_port_id: row.departure_port_id,
            arrival_port_id: row.arrival_port_id,
            distance_nm: row.distance_nm,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StaffRow {
    id: Uuid,
    subject: String,
    name: String,
    position: String,
    contact_number: String,
    email: String,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Staff {
            id: row.id,
            subject: row.subject,
            name: row.name,
            position: row.position,
            contact_number: row.contact_number,
            email: row.email,
        }
    }
}

#[async_trait]
impl CatalogRepository for PostgresCatalogRepository {
    async fn create_ferry(&self, ferry: &Ferry) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO ferries (id, name, model, registration_number, capacity)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ferry.id)
        .bind(&ferry.name)
        .bind(&ferry.model)
        .bind(&ferry.registration_number)
        .bind(ferry.capacity)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_ferry(&self, id: Uuid) -> Result<Option<Ferry>, RepoError> {
        let row = sqlx::query_as::<_, FerryRow>(
            "SELECT id, name, model, registration_number, capacity FROM ferries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Ferry::from))
    }

    async fn list_ferries(&self) -> Result<Vec<Ferry>, RepoError> {
        let rows = sqlx::query_as::<_, FerryRow>(
            "SELECT id, name, model, registration_number, capacity FROM ferries ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Ferry::from).collect())
    }

    async fn update_ferry(&self, ferry: &Ferry) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE ferries
            SET name = $1, model = $2, registration_number = $3, capacity = $4
            WHERE id = $5
            "#,
        )
        .bind(&ferry.name)
        .bind(&ferry.model)
        .bind(&ferry.registration_number)
        .bind(ferry.capacity)
        .bind(ferry.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_ferry(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query("DELETE FROM ferries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_port(&self, port: &Port) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO ports (id, name, location) VALUES ($1, $2, $3)")
            .bind(port.id)
            .bind(&port.name)
            .bind(&port.location)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get_port(&self, id: Uuid) -> Result<Option<Port>, RepoError> {
        let row =
            sqlx::query_as::<_, PortRow>("SELECT id, name, location FROM ports WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Port::from))
    }

    async fn list_ports(&self) -> Result<Vec<Port>, RepoError> {
        let rows =
            sqlx::query_as::<_, PortRow>("SELECT id, name, location FROM ports ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Port::from).collect())
    }

    async fn create_route(&self, route: &Route) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO routes (id, name, departure_port_id, arrival_port_id, distance_nm)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(route.id)
        .bind(&route.name)
        .bind(route.departure_port_id)
        .bind(route.arrival_port_id)
        .bind(route.distance_nm)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_route(&self, id: Uuid) -> Result<Option<Route>, RepoError> {
        let row = sqlx::query_as::<_, RouteRow>(
            "SELECT id, name, departure_port_id, arrival_port_id, distance_nm FROM routes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Route::from))
    }

    async fn list_routes(&self) -> Result<Vec<Route>, RepoError> {
        let rows = sqlx::query_as::<_, RouteRow>(
            "SELECT id, name, departure_port_id, arrival_port_id, distance_nm FROM routes ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Route::from).collect())
    }

    async fn create_staff(&self, staff: &Staff) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO staff (id, subject, name, position, contact_number, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(staff.id)
        .bind(&staff.subject)
        .bind(&staff.name)
        .bind(&staff.position)
        .bind(&staff.contact_number)
        .bind(&staff.email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_staff(&self, id: Uuid) -> Result<Option<Staff>, RepoError> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, subject, name, position, contact_number, email FROM staff WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Staff::from))
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, RepoError> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, subject, name, position, contact_number, email FROM staff ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Staff::from).collect())
    }
}
