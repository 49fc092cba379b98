//! Admin session gate for the song request back office
//!
//! Decides whether admin pages render or send the visitor to the login page,
//! based on a logged-in flag and login time kept in the browser's session
//! storage. Sessions end 24 hours after login, or after 30 minutes without
//! pointer, keyboard, scroll or touch activity.
//!
//! The flag lives on the client and can be set by anyone with a console, so
//! this gate is a convenience for the UI only. The API does not check it.

pub mod config;
pub mod error;
pub mod gate;
pub mod store;

pub use config::GateConfig;
pub use error::GateError;
pub use gate::{ActivityEvent, AdminHeaders, AdminSession, GateDecision, SessionGate};
pub use store::{MemoryStore, SessionStore};
