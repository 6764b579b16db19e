use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A terminal a route departs from or arrives at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    pub id: Uuid,
    pub name: String,
    pub location: String,
}

impl Port {
    pub fn new(name: String, location: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            location,
        }
    }
}

/// A sailing lane between two ports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub name: String,
    pub departure_port_id: Uuid,
    pub arrival_port_id: Uuid,
    pub distance_nm: f64,
}

impl Route {
    pub fn new(
        name: String,
        departure_port_id: Uuid,
        arrival_port_id: Uuid,
        distance_nm: f64,
    ) -> Result<Self, RouteError> {
        if departure_port_id == arrival_port_id {
            return Err(RouteError::SamePort);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            departure_port_id,
            arrival_port_id,
            distance_nm,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Departure and arrival ports cannot be the same")]
    SamePort,

    #[error("Port not found: {0}")]
    PortNotFound(String),

    #[error("Route not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_ports_must_differ() {
        let port = Uuid::new_v4();
        let result = Route::new("Circular".to_string(), port, port, 12.0);
        assert!(matches!(result, Err(RouteError::SamePort)));
    }

    #[test]
    fn test_route_between_distinct_ports() {
        let route = Route::new(
            "Batangas - Calapan".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            24.5,
        )
        .unwrap();
        assert_ne!(route.departure_port_id, route.arrival_port_id);
    }
}
