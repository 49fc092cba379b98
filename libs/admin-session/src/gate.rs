//! Session gate deciding whether admin pages render

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::{config::GateConfig, error::GateError, store::SessionStore};

/// Path fragment identifying the login page, which is never gated
const LOGIN_PAGE_MARKER: &str = "admin-login";

/// Header carrying the admin user name on API calls
pub const ADMIN_USER_HEADER: &str = "X-Admin-User";

/// Header carrying the session flag on API calls
pub const ADMIN_SESSION_HEADER: &str = "X-Admin-Session";

/// Live admin session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    pub user: Option<String>,
    pub login_time: DateTime<Utc>,
}

/// Outcome of gating a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the admin content
    Render(AdminSession),
    /// Leave for the login page
    Redirect { location: String },
    /// The login page itself: nothing to check
    Skip,
}

/// User activity that keeps a session alive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityEvent {
    MouseDown,
    MouseMove,
    KeyPress,
    Scroll,
    TouchStart,
    Click,
}

impl ActivityEvent {
    pub const ALL: [ActivityEvent; 6] = [
        ActivityEvent::MouseDown,
        ActivityEvent::MouseMove,
        ActivityEvent::KeyPress,
        ActivityEvent::Scroll,
        ActivityEvent::TouchStart,
        ActivityEvent::Click,
    ];

    /// DOM event name
    pub fn dom_name(self) -> &'static str {
        match self {
            ActivityEvent::MouseDown => "mousedown",
            ActivityEvent::MouseMove => "mousemove",
            ActivityEvent::KeyPress => "keypress",
            ActivityEvent::Scroll => "scroll",
            ActivityEvent::TouchStart => "touchstart",
            ActivityEvent::Click => "click",
        }
    }

    pub fn from_dom_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|event| event.dom_name() == name)
    }
}

/// Identification headers attached to admin API calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminHeaders {
    pub user: String,
    pub session: String,
}

impl AdminHeaders {
    pub fn pairs(&self) -> [(&'static str, &str); 2] {
        [
            (ADMIN_USER_HEADER, self.user.as_str()),
            (ADMIN_SESSION_HEADER, self.session.as_str()),
        ]
    }
}

/// Session gate over a session store
///
/// Time is passed in by the caller so the host decides what "now" is.
#[derive(Debug)]
pub struct SessionGate<S: SessionStore> {
    config: GateConfig,
    store: S,
    last_activity: Option<DateTime<Utc>>,
}

impl<S: SessionStore> SessionGate<S> {
    /// Create a new session gate
    pub fn new(config: GateConfig, store: S) -> Self {
        Self {
            config,
            store,
            last_activity: None,
        }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record a successful login
    pub fn login(&mut self, user: &str, now: DateTime<Utc>) {
        info!("Admin session opened for {}", user);

        self.store.set(&self.config.session_key, "true");
        self.store.set(&self.config.user_key, user);
        self.store.set(&self.config.time_key, &now.to_rfc3339());
        self.last_activity = Some(now);
    }

    /// Whether a session exists and is younger than the absolute lifetime
    ///
    /// An expired or unreadable session is cleared on the way.
    pub fn is_logged_in(&mut self, now: DateTime<Utc>) -> bool {
        if self.store.get(&self.config.session_key).is_none() {
            return false;
        }

        let Some(raw_login_time) = self.store.get(&self.config.time_key) else {
            return false;
        };

        let Some(login_time) = parse_login_time(&raw_login_time) else {
            warn!("Unreadable admin login time {:?}, clearing session", raw_login_time);
            self.clear_session();
            return false;
        };

        if now - login_time > self.config.session_duration {
            info!("Admin session expired after {}", self.config.session_duration);
            self.clear_session();
            return false;
        }

        true
    }

    /// Gate the page at `path`
    ///
    /// On success the inactivity timer starts. On failure the page is
    /// remembered so the login page can send the admin back to it.
    pub fn check(&mut self, path: &str, now: DateTime<Utc>) -> GateDecision {
        if path.contains(LOGIN_PAGE_MARKER) {
            return GateDecision::Skip;
        }

        if !self.is_logged_in(now) {
            return self.redirect_to_login(path);
        }

        self.last_activity = Some(now);

        match self.login_time() {
            Some(login_time) => GateDecision::Render(AdminSession {
                user: self.user(),
                login_time,
            }),
            None => self.redirect_to_login(path),
        }
    }

    /// Reset the inactivity timer
    pub fn record_activity(&mut self, event: ActivityEvent, now: DateTime<Utc>) {
        if self.last_activity.is_some() {
            debug!("Admin activity: {}", event.dom_name());
            self.last_activity = Some(now);
        }
    }

    /// Close the session once the inactivity window has passed
    ///
    /// Returns the redirect to follow when the session was closed.
    pub fn poll(&mut self, current_path: &str, now: DateTime<Utc>) -> Option<GateDecision> {
        let last_activity = self.last_activity?;

        if now - last_activity >= self.config.inactivity_timeout {
            warn!(
                "Admin session closed after {} of inactivity",
                self.config.inactivity_timeout
            );
            return Some(self.logout(current_path));
        }

        None
    }

    /// End the session and head for the login page
    pub fn logout(&mut self, current_path: &str) -> GateDecision {
        info!("Admin logout");

        self.clear_session();
        self.store.remove(&self.config.redirect_key);
        self.redirect_to_login(current_path)
    }

    /// Page to open after a successful login, consumed on read
    pub fn take_redirect_after_login(&mut self) -> Option<String> {
        let target = self.store.get(&self.config.redirect_key)?;
        self.store.remove(&self.config.redirect_key);
        Some(target)
    }

    /// Whole minutes since login, for the session indicator
    pub fn session_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.login_time()
            .map(|login_time| (now - login_time).num_minutes())
    }

    /// Whether protected elements may be shown
    pub fn protect(&mut self, now: DateTime<Utc>) -> bool {
        self.is_logged_in(now)
    }

    /// Headers identifying the admin on API calls
    pub fn admin_headers(&mut self, now: DateTime<Utc>) -> Result<AdminHeaders, GateError> {
        if !self.is_logged_in(now) {
            return Err(GateError::AuthenticationRequired);
        }

        Ok(AdminHeaders {
            user: self.user().unwrap_or_default(),
            session: self
                .store
                .get(&self.config.session_key)
                .unwrap_or_default(),
        })
    }

    /// React to the status of an admin API call
    ///
    /// 401 and 403 end the session.
    pub fn on_response_status(&mut self, status: u16, current_path: &str) -> Result<(), GateError> {
        if status == 401 || status == 403 {
            self.logout(current_path);
            return Err(GateError::SessionExpired);
        }

        Ok(())
    }

    pub fn user(&self) -> Option<String> {
        self.store.get(&self.config.user_key)
    }

    fn login_time(&self) -> Option<DateTime<Utc>> {
        self.store
            .get(&self.config.time_key)
            .and_then(|raw| parse_login_time(&raw))
    }

    fn redirect_to_login(&mut self, current_path: &str) -> GateDecision {
        if current_path != self.config.login_page {
            self.store.set(&self.config.redirect_key, current_path);
        }

        GateDecision::Redirect {
            location: self.config.login_page.clone(),
        }
    }

    fn clear_session(&mut self) {
        self.store.remove(&self.config.session_key);
        self.store.remove(&self.config.user_key);
        self.store.remove(&self.config.time_key);
        self.last_activity = None;
    }
}

fn parse_login_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 21, 18, 0, 0).unwrap()
    }

    fn gate() -> SessionGate<MemoryStore> {
        SessionGate::new(GateConfig::default(), MemoryStore::new())
    }

    fn logged_in_gate() -> SessionGate<MemoryStore> {
        let mut gate = gate();
        gate.login("dj", start());
        gate
    }

    #[test]
    fn test_anonymous_visitor_is_redirected() {
        let mut gate = gate();

        let decision = gate.check("/admin.html", start());
        assert_eq!(
            decision,
            GateDecision::Redirect {
                location: "/admin-login.html".to_string()
            }
        );
        assert_eq!(
            gate.take_redirect_after_login().as_deref(),
            Some("/admin.html")
        );
        assert_eq!(gate.take_redirect_after_login(), None);
    }

    #[test]
    fn test_login_page_is_not_gated() {
        let mut gate = gate();
        assert_eq!(gate.check("/admin-login.html", start()), GateDecision::Skip);
    }

    #[test]
    fn test_logged_in_admin_sees_page() {
        let mut gate = logged_in_gate();

        let decision = gate.check("/admin.html", start() + Duration::minutes(5));
        assert_eq!(
            decision,
            GateDecision::Render(AdminSession {
                user: Some("dj".to_string()),
                login_time: start(),
            })
        );
        assert_eq!(gate.session_minutes(start() + Duration::seconds(150)), Some(2));
    }

    #[test]
    fn test_session_expires_after_absolute_duration() {
        let mut gate = logged_in_gate();

        assert!(gate.is_logged_in(start() + Duration::hours(24)));
        assert!(!gate.is_logged_in(start() + Duration::hours(24) + Duration::seconds(1)));
        // expiry clears the stored flag
        assert_eq!(gate.user(), None);
        assert!(!gate.is_logged_in(start()));
    }

    #[test]
    fn test_flag_without_login_time_is_not_a_session() {
        let mut store = MemoryStore::new();
        store.set("dj_admin_logged_in", "true");
        let mut gate = SessionGate::new(GateConfig::default(), store);
        assert!(!gate.is_logged_in(start()));

        let mut store = MemoryStore::new();
        store.set("dj_admin_logged_in", "true");
        store.set("dj_login_time", "yesterday");
        let mut gate = SessionGate::new(GateConfig::default(), store);
        assert!(!gate.is_logged_in(start()));
        assert_eq!(gate.store().get("dj_admin_logged_in"), None);
    }

    #[test]
    fn test_inactivity_closes_session() {
        let mut gate = logged_in_gate();
        gate.check("/admin.html", start());

        assert_eq!(gate.poll("/admin.html", start() + Duration::minutes(29)), None);

        let decision = gate.poll("/admin.html", start() + Duration::minutes(30));
        assert_eq!(
            decision,
            Some(GateDecision::Redirect {
                location: "/admin-login.html".to_string()
            })
        );
        assert!(!gate.is_logged_in(start() + Duration::minutes(31)));
        assert_eq!(
            gate.take_redirect_after_login().as_deref(),
            Some("/admin.html")
        );
    }

    #[test]
    fn test_activity_resets_inactivity_timer() {
        let mut gate = logged_in_gate();
        gate.check("/admin.html", start());

        gate.record_activity(ActivityEvent::Scroll, start() + Duration::minutes(20));
        assert_eq!(gate.poll("/admin.html", start() + Duration::minutes(45)), None);
        assert!(gate.poll("/admin.html", start() + Duration::minutes(50)).is_some());
    }

    #[test]
    fn test_activity_without_session_is_ignored() {
        let mut gate = gate();
        gate.record_activity(ActivityEvent::Click, start());
        assert_eq!(gate.poll("/admin.html", start() + Duration::hours(1)), None);
    }

    #[test]
    fn test_admin_headers() {
        let mut gate = gate();
        assert_eq!(
            gate.admin_headers(start()),
            Err(GateError::AuthenticationRequired)
        );

        gate.login("dj", start());
        let headers = gate.admin_headers(start()).unwrap();
        assert_eq!(
            headers.pairs(),
            [("X-Admin-User", "dj"), ("X-Admin-Session", "true")]
        );
    }

    #[test]
    fn test_refused_api_call_logs_out() {
        let mut gate = logged_in_gate();

        assert_eq!(gate.on_response_status(200, "/admin.html"), Ok(()));
        assert!(gate.protect(start()));

        assert_eq!(
            gate.on_response_status(403, "/admin.html"),
            Err(GateError::SessionExpired)
        );
        assert!(!gate.protect(start()));
    }

    #[test]
    fn test_activity_event_names() {
        for event in ActivityEvent::ALL {
            assert_eq!(ActivityEvent::from_dom_name(event.dom_name()), Some(event));
        }
        assert_eq!(ActivityEvent::from_dom_name("resize"), None);
    }
}
