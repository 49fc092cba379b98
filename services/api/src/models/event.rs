//! Event models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::validation::{parse_timestamp, required};

/// Status given to events created without one
pub const DEFAULT_EVENT_STATUS: &str = "preparation";

/// Columns selected and returned for events
pub const EVENT_COLUMNS: &str = "id, name, date, status, location, description, short_code, \
                                 expected_guests, created_at, updated_at";

/// Event row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub short_code: Option<String>,
    pub expected_guests: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by event create and update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub name: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub short_code: Option<String>,
    pub expected_guests: Option<i32>,
    pub updated_at: Option<String>,
}

/// Validated event ready for insertion
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub status: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub short_code: Option<String>,
    pub expected_guests: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewEvent {
    /// Validate a create payload, generating the id and applying defaults
    pub fn from_payload(payload: EventPayload, now: DateTime<Utc>) -> Result<Self, String> {
        let (Some(name), Some(date)) = (required(payload.name), required(payload.date)) else {
            return Err("Event name and date are required".to_string());
        };

        let date = parse_timestamp(&date).ok_or_else(|| format!("Invalid event date: {}", date))?;
        let updated_at = match payload.updated_at {
            Some(value) => parse_timestamp(&value)
                .ok_or_else(|| format!("Invalid updatedAt timestamp: {}", value))?,
            None => now,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            date,
            status: required(payload.status).unwrap_or_else(|| DEFAULT_EVENT_STATUS.to_string()),
            location: payload.location,
            description: payload.description,
            short_code: payload.short_code,
            expected_guests: payload.expected_guests,
            created_at: now,
            updated_at,
        })
    }
}

/// New value for one event column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Timestamp(DateTime<Utc>),
    Integer(i32),
}

/// Partial update of an event: column name to new value
///
/// Only columns present in the patch end up in the `SET` clause, and every
/// value is bound as a parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    fields: Vec<(&'static str, FieldValue)>,
}

impl EventPatch {
    /// Build a patch from an update payload
    ///
    /// Fields that are absent or null are left alone. `updated_at` is always
    /// part of the patch: the supplied value if any, `now` otherwise.
    pub fn from_payload(payload: EventPayload, now: DateTime<Utc>) -> Result<Self, String> {
        let mut patch = Self::default();

        if let Some(name) = payload.name {
            if name.is_empty() {
                return Err("Event name cannot be empty".to_string());
            }
            patch.set("name", FieldValue::Text(name));
        }
        if let Some(date) = payload.date {
            let parsed =
                parse_timestamp(&date).ok_or_else(|| format!("Invalid event date: {}", date))?;
            patch.set("date", FieldValue::Timestamp(parsed));
        }
        if let Some(status) = payload.status {
            patch.set("status", FieldValue::Text(status));
        }
        if let Some(location) = payload.location {
            patch.set("location", FieldValue::Text(location));
        }
        if let Some(expected_guests) = payload.expected_guests {
            patch.set("expected_guests", FieldValue::Integer(expected_guests));
        }
        if let Some(description) = payload.description {
            patch.set("description", FieldValue::Text(description));
        }
        if let Some(short_code) = payload.short_code {
            patch.set("short_code", FieldValue::Text(short_code));
        }

        let updated_at = match payload.updated_at {
            Some(value) => parse_timestamp(&value)
                .ok_or_else(|| format!("Invalid updatedAt timestamp: {}", value))?,
            None => now,
        };
        patch.set("updated_at", FieldValue::Timestamp(updated_at));

        Ok(patch)
    }

    /// Set a column, replacing any earlier value for it
    pub fn set(&mut self, column: &'static str, value: FieldValue) {
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Value staged for a column
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in the order they will be assigned
    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|(name, _)| *name).collect()
    }

    /// Parameterized `UPDATE events SET ... WHERE id = $n RETURNING ...`
    pub fn update_query(&self, id: Uuid) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("UPDATE events SET ");

        {
            let mut assignments = builder.separated(", ");
            for (column, value) in &self.fields {
                assignments.push(*column);
                assignments.push_unseparated(" = ");
                match value {
                    FieldValue::Text(text) => assignments.push_bind_unseparated(text.clone()),
                    FieldValue::Timestamp(ts) => assignments.push_bind_unseparated(*ts),
                    FieldValue::Integer(n) => assignments.push_bind_unseparated(*n),
                };
            }
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(EVENT_COLUMNS);

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_event_applies_defaults() {
        let payload = EventPayload {
            name: Some("Summer Party".into()),
            date: Some("2025-06-21T20:00:00Z".into()),
            ..Default::default()
        };

        let event = NewEvent::from_payload(payload, now()).unwrap();
        assert_eq!(event.status, DEFAULT_EVENT_STATUS);
        assert_eq!(event.created_at, now());
        assert_eq!(event.updated_at, event.created_at);
        assert_eq!(event.id.get_version_num(), 4);
        assert_eq!(event.date, Utc.with_ymd_and_hms(2025, 6, 21, 20, 0, 0).unwrap());
    }

    #[test]
    fn test_new_event_keeps_supplied_fields() {
        let payload = EventPayload {
            name: Some("Wedding".into()),
            date: Some("2025-09-13".into()),
            status: Some("live".into()),
            location: Some("Douala".into()),
            expected_guests: Some(120),
            short_code: Some("WED25".into()),
            updated_at: Some("2025-04-30T08:00:00Z".into()),
            ..Default::default()
        };

        let event = NewEvent::from_payload(payload, now()).unwrap();
        assert_eq!(event.status, "live");
        assert_eq!(event.location.as_deref(), Some("Douala"));
        assert_eq!(event.expected_guests, Some(120));
        assert_eq!(event.short_code.as_deref(), Some("WED25"));
        assert_eq!(
            event.updated_at,
            Utc.with_ymd_and_hms(2025, 4, 30, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_new_event_requires_name_and_date() {
        let missing_name = EventPayload {
            date: Some("2025-06-21".into()),
            ..Default::default()
        };
        assert!(NewEvent::from_payload(missing_name, now()).is_err());

        let empty_name = EventPayload {
            name: Some(String::new()),
            date: Some("2025-06-21".into()),
            ..Default::default()
        };
        assert!(NewEvent::from_payload(empty_name, now()).is_err());

        let missing_date = EventPayload {
            name: Some("Party".into()),
            ..Default::default()
        };
        assert_eq!(
            NewEvent::from_payload(missing_date, now()).unwrap_err(),
            "Event name and date are required"
        );
    }

    #[test]
    fn test_patch_only_touches_present_fields() {
        let payload = EventPayload {
            status: Some("live".into()),
            ..Default::default()
        };

        let patch = EventPatch::from_payload(payload, now()).unwrap();
        assert_eq!(patch.columns(), vec!["status", "updated_at"]);
        assert_eq!(patch.get("status"), Some(&FieldValue::Text("live".into())));
        assert_eq!(patch.get("updated_at"), Some(&FieldValue::Timestamp(now())));
        assert_eq!(patch.get("name"), None);
    }

    #[test]
    fn test_patch_always_refreshes_updated_at() {
        let patch = EventPatch::from_payload(EventPayload::default(), now()).unwrap();
        assert!(!patch.is_empty());
        assert_eq!(patch.columns(), vec!["updated_at"]);

        let supplied = EventPayload {
            updated_at: Some("2025-05-02T00:00:00Z".into()),
            ..Default::default()
        };
        let patch = EventPatch::from_payload(supplied, now()).unwrap();
        assert_eq!(
            patch.get("updated_at"),
            Some(&FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2025, 5, 2, 0, 0, 0).unwrap()
            ))
        );
    }

    #[test]
    fn test_patch_rejects_empty_name_and_bad_date() {
        let empty_name = EventPayload {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(EventPatch::from_payload(empty_name, now()).is_err());

        let bad_date = EventPayload {
            date: Some("soon".into()),
            ..Default::default()
        };
        assert!(EventPatch::from_payload(bad_date, now()).is_err());
    }

    #[test]
    fn test_update_query_is_parameterized() {
        let payload = EventPayload {
            name: Some("Renamed".into()),
            expected_guests: Some(80),
            ..Default::default()
        };
        let patch = EventPatch::from_payload(payload, now()).unwrap();

        let builder = patch.update_query(Uuid::nil());
        assert_eq!(
            builder.sql(),
            format!(
                "UPDATE events SET name = $1, expected_guests = $2, updated_at = $3 \
                 WHERE id = $4 RETURNING {}",
                EVENT_COLUMNS
            )
        );
    }
}
