use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Participant,
    Coordinator,
    Hod,
    Admin,
}

impl UserRole {
    /// Roles allowed to view certificates they do not own.
    pub fn is_elevated(&self) -> bool {
        matches!(self, UserRole::Coordinator | UserRole::Hod | UserRole::Admin)
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub designation: Option<String>,
    pub institute: Option<String>,
    pub contact: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub signature_image: Option<Vec<u8>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
