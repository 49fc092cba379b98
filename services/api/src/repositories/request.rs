//! Song request repository for database operations

use common::{database::Database, error::DatabaseResult};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::request::{NewSongRequest, REQUEST_COLUMNS, SongRequest};

/// Song request repository for database operations
#[derive(Clone)]
pub struct RequestRepository {
    db: Database,
}

impl RequestRepository {
    /// Create a new request repository
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get requests, newest first, optionally only those of one event
    pub async fn get_all(&self, event_id: Option<Uuid>) -> DatabaseResult<Vec<SongRequest>> {
        let pool = self.db.pool().await?;

        let requests = match event_id {
            Some(event_id) => {
                sqlx::query_as::<_, SongRequest>(&format!(
                    "SELECT {} FROM requests WHERE event_id = $1 ORDER BY timestamp DESC",
                    REQUEST_COLUMNS
                ))
                .bind(event_id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, SongRequest>(&format!(
                    "SELECT {} FROM requests ORDER BY timestamp DESC",
                    REQUEST_COLUMNS
                ))
                .fetch_all(pool)
                .await?
            }
        };

        Ok(requests)
    }

    /// Insert a new request and return the stored row
    pub async fn create(&self, request: &NewSongRequest) -> DatabaseResult<SongRequest> {
        let pool = self.db.pool().await?;

        let created = sqlx::query_as::<_, SongRequest>(&format!(
            r#"
            INSERT INTO requests (id, event_id, song_title, artist, user_name, user_id,
                                  status, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(request.id)
        .bind(request.event_id)
        .bind(&request.song_title)
        .bind(&request.artist)
        .bind(&request.user_name)
        .bind(request.user_id)
        .bind(&request.status)
        .bind(request.timestamp)
        .fetch_one(pool)
        .await?;

        info!("Created request {} for event {:?}", created.id, created.event_id);
        Ok(created)
    }

    /// Set the status of a request; `None` when no request has this id
    pub async fn update_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> DatabaseResult<Option<SongRequest>> {
        let pool = self.db.pool().await?;

        let updated = sqlx::query_as::<_, SongRequest>(&format!(
            "UPDATE requests SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            REQUEST_COLUMNS
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Delete a request, returning how many rows went away
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<u64> {
        let pool = self.db.pool().await?;

        let result = sqlx::query("DELETE FROM requests WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            debug!("Delete of request {} matched no row", id);
        }

        Ok(result.rows_affected())
    }
}
