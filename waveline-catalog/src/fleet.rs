use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vessel in the operator's fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ferry {
    pub id: Uuid,
    pub name: String,
    pub model: String,
    pub registration_number: String,
    pub capacity: i32,
}

impl Ferry {
    pub fn new(
        name: String,
        model: String,
        registration_number: String,
        capacity: i32,
    ) -> Result<Self, FleetError> {
        if capacity <= 0 {
            return Err(FleetError::InvalidCapacity(capacity));
        }
        if registration_number.trim().is_empty() {
            return Err(FleetError::MissingRegistration);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            model,
            registration_number,
            capacity,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FleetError {
    #[error("Ferry capacity must be positive, got {0}")]
    InvalidCapacity(i32),

    #[error("Ferry registration number is required")]
    MissingRegistration,

    #[error("Ferry not found: {0}")]
    NotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_capacity() {
        let result = Ferry::new(
            "MV Santa Clara".to_string(),
            "Fastcraft 320".to_string(),
            "PH-2201".to_string(),
            0,
        );
        assert!(matches!(result, Err(FleetError::InvalidCapacity(0))));
    }

    #[test]
    fn test_rejects_blank_registration() {
        let result = Ferry::new(
            "MV Santa Clara".to_string(),
            "Fastcraft 320".to_string(),
            "  ".to_string(),
            180,
        );
        assert!(matches!(result, Err(FleetError::MissingRegistration)));
    }
}
