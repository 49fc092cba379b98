//! Idempotent schema creation for the events and requests tables

use crate::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

/// Advisory lock key serializing schema creation across processes
const SCHEMA_LOCK_KEY: i64 = 0x536f_6e67_5265_7173;

/// Statements run, in order, on every cold start
pub const SCHEMA_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        date TIMESTAMPTZ NOT NULL,
        status TEXT NOT NULL DEFAULT 'preparation',
        location TEXT,
        description TEXT,
        short_code TEXT,
        expected_guests INTEGER,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS requests (
        id UUID PRIMARY KEY,
        event_id UUID REFERENCES events(id) ON DELETE CASCADE,
        song_title TEXT NOT NULL,
        artist TEXT NOT NULL,
        user_name TEXT NOT NULL,
        user_id UUID NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS requests_event_id_idx ON requests (event_id)
    "#,
];

/// Ensure the events and requests tables exist
///
/// Safe to call repeatedly and from several processes at once: the statements
/// run in one transaction holding a transaction-scoped advisory lock.
pub async fn ensure_schema(pool: &PgPool) -> DatabaseResult<()> {
    let mut tx = pool.begin().await.map_err(DatabaseError::Schema)?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await
        .map_err(DatabaseError::Schema)?;

    for statement in SCHEMA_STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::Schema)?;
    }

    tx.commit().await.map_err(DatabaseError::Schema)?;

    info!("Database schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_are_idempotent() {
        for statement in SCHEMA_STATEMENTS {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement is not re-runnable: {statement}"
            );
        }
    }

    #[test]
    fn test_requests_cascade_on_event_delete() {
        let requests = SCHEMA_STATEMENTS[1];
        assert!(requests.contains("REFERENCES events(id) ON DELETE CASCADE"));
        assert!(requests.contains("status TEXT NOT NULL DEFAULT 'pending'"));
        assert!(SCHEMA_STATEMENTS[0].contains("DEFAULT 'preparation'"));
    }
}
