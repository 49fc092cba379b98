//! Gate configuration

use chrono::Duration;

/// Storage keys, login page and session lifetimes
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Key of the logged-in flag
    pub session_key: String,
    /// Key of the admin user name
    pub user_key: String,
    /// Key of the login time (RFC 3339)
    pub time_key: String,
    /// Key remembering the page to return to after login
    pub redirect_key: String,
    /// Path of the login page
    pub login_page: String,
    /// Absolute session lifetime, counted from login
    pub session_duration: Duration,
    /// Idle time after which the session is closed
    pub inactivity_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            session_key: "dj_admin_logged_in".to_string(),
            user_key: "dj_admin_user".to_string(),
            time_key: "dj_login_time".to_string(),
            redirect_key: "dj_redirect_after_login".to_string(),
            login_page: "/admin-login.html".to_string(),
            session_duration: Duration::hours(24),
            inactivity_timeout: Duration::minutes(30),
        }
    }
}
