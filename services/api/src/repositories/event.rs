//! Event repository for database operations

use common::{database::Database, error::DatabaseResult};
use sqlx::Acquire;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::event::{EVENT_COLUMNS, Event, EventPatch, NewEvent};

/// Event repository for database operations
#[derive(Clone)]
pub struct EventRepository {
    db: Database,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get all events, most recent date first
    pub async fn get_all(&self) -> DatabaseResult<Vec<Event>> {
        let pool = self.db.pool().await?;

        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {} FROM events ORDER BY date DESC",
            EVENT_COLUMNS
        ))
        .fetch_all(pool)
        .await?;

        Ok(events)
    }

    /// Insert a new event and return the stored row
    pub async fn create(&self, event: &NewEvent) -> DatabaseResult<Event> {
        let pool = self.db.pool().await?;

        let created = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (id, name, date, status, location, description, short_code,
                                expected_guests, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        ))
        .bind(event.id)
        .bind(&event.name)
        .bind(event.date)
        .bind(&event.status)
        .bind(&event.location)
        .bind(&event.description)
        .bind(&event.short_code)
        .bind(event.expected_guests)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(pool)
        .await?;

        info!("Created event {}", created.id);
        Ok(created)
    }

    /// Apply a partial update; `None` when no event has this id
    pub async fn update(&self, id: Uuid, patch: &EventPatch) -> DatabaseResult<Option<Event>> {
        let pool = self.db.pool().await?;

        let mut query = patch.update_query(id);
        let updated = query
            .build_query_as::<Event>()
            .fetch_optional(pool)
            .await?;

        Ok(updated)
    }

    /// Delete an event and its requests; `false` when no event has this id
    ///
    /// Runs in one transaction. The dependent-request cleanup sits in a
    /// savepoint: if it fails the failure is logged and rolled back, and the
    /// event delete still goes ahead (the foreign key cascades anyway).
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let pool = self.db.pool().await?;
        let mut tx = pool.begin().await?;

        {
            let mut savepoint = tx.begin().await?;
            let cleanup = sqlx::query("DELETE FROM requests WHERE event_id = $1")
                .bind(id)
                .execute(&mut *savepoint)
                .await;

            match cleanup {
                Ok(result) => {
                    savepoint.commit().await?;
                    if result.rows_affected() > 0 {
                        info!(
                            "Removed {} requests of event {}",
                            result.rows_affected(),
                            id
                        );
                    }
                }
                Err(e) => {
                    warn!("Ignoring failure while removing requests of event {}: {}", id, e);
                    savepoint.rollback().await?;
                }
            }
        }

        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM events WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(deleted.is_some())
    }
}
