//! Errors reported by the session gate

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// No live admin session
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The server refused the admin headers
    #[error("Session expired")]
    SessionExpired,
}
