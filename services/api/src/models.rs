//! API models for request and response payloads

pub mod event;
pub mod request;

pub use event::{Event, EventPatch, EventPayload, NewEvent};
pub use request::{NewSongRequest, RequestQuery, SongRequest, SongRequestPayload, StatusPayload};
