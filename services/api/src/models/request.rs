//! Song request models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::validation::{is_uuid, parse_id, required};

/// Status every new request starts with, and the fallback on update
pub const DEFAULT_REQUEST_STATUS: &str = "pending";

/// Columns selected and returned for requests
pub const REQUEST_COLUMNS: &str = "id, event_id, song_title, artist, user_name, user_id, \
                                   status, timestamp, created_at, updated_at";

/// Song request row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SongRequest {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub song_title: String,
    pub artist: String,
    pub user_name: String,
    pub user_id: Uuid,
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by request creation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRequestPayload {
    pub event_id: Option<String>,
    pub song_title: Option<String>,
    pub artist: Option<String>,
    pub user_name: Option<String>,
    /// Anything the client sends; only a well-formed UUID string is kept
    pub user_id: Option<serde_json::Value>,
}

/// Body accepted by request update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusPayload {
    pub status: Option<String>,
}

impl StatusPayload {
    /// Status to store; an absent or empty status resets to `pending`
    pub fn resolved(self) -> String {
        required(self.status).unwrap_or_else(|| DEFAULT_REQUEST_STATUS.to_string())
    }
}

/// Query string of the requests endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestQuery {
    /// Filter for listing
    #[serde(rename = "eventId")]
    pub event_id: Option<String>,
    /// Target of update and delete
    pub id: Option<String>,
}

/// Validated request ready for insertion
#[derive(Debug, Clone)]
pub struct NewSongRequest {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub song_title: String,
    pub artist: String,
    pub user_name: String,
    pub user_id: Uuid,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl NewSongRequest {
    /// Validate a create payload
    ///
    /// A `userId` that is not a UUID is replaced by a freshly generated one;
    /// the submitted value is dropped without error.
    pub fn from_payload(payload: SongRequestPayload, now: DateTime<Utc>) -> Result<Self, String> {
        let (Some(song_title), Some(artist), Some(user_name)) = (
            required(payload.song_title),
            required(payload.artist),
            required(payload.user_name),
        ) else {
            return Err("Song title, artist and user name are required".to_string());
        };

        let event_id = match required(payload.event_id) {
            Some(raw) => Some(parse_id(&raw, "event")?),
            None => None,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            event_id,
            song_title,
            artist,
            user_name,
            user_id: sanitize_user_id(payload.user_id.as_ref()),
            status: DEFAULT_REQUEST_STATUS.to_string(),
            timestamp: now,
        })
    }
}

/// Keep a submitted user id only when it is a UUID string
pub fn sanitize_user_id(value: Option<&serde_json::Value>) -> Uuid {
    match value {
        Some(serde_json::Value::String(raw)) if is_uuid(raw) => {
            Uuid::parse_str(raw).unwrap_or_else(|_| Uuid::new_v4())
        }
        _ => Uuid::new_v4(),
    }
}
