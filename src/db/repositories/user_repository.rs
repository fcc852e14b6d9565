use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::User;
use crate::db::DatabaseError;

const USER_COLUMNS: &str = "id, name, email, role, designation, institute, contact, is_active, \
     signature_image, created_at, updated_at";

pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// The active head-of-department signs issued certificates. Absence
    /// must never block issuance; callers substitute a placeholder.
    pub async fn find_active_signer(pool: &PgPool) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE role = 'hod' AND is_active = TRUE \
             ORDER BY updated_at DESC \
             LIMIT 1"
        ))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
