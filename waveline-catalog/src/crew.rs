use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A staff member eligible for ferry duty assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    pub id: Uuid,
    /// Auth subject for staff logins.
    pub subject: String,
    pub name: String,
    pub position: String,
    pub contact_number: String,
    pub email: String,
}

impl Staff {
    pub fn new(subject: String, name: String, position: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject,
            name,
            position,
            contact_number: String::new(),
            email: String::new(),
        }
    }
}
