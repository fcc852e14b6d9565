use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Event;
use crate::db::DatabaseError;

const EVENT_COLUMNS: &str =
    "id, title, start_date, end_date, venue, mode, duration, skills, created_at, updated_at";

pub struct EventRepository;

impl EventRepository {
    pub async fn find_by_id(pool: &PgPool, event_id: Uuid) -> Result<Option<Event>, DatabaseError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(event_id)
        .fetch_optional(pool)
        .await?;

        Ok(event)
    }
}
