//! Application state shared across handlers

use common::database::Database;

use crate::repositories::{EventRepository, RequestRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub event_repository: EventRepository,
    pub request_repository: RequestRepository,
}

impl AppState {
    /// Build the state around one shared database handle
    pub fn new(db: Database) -> Self {
        Self {
            event_repository: EventRepository::new(db.clone()),
            request_repository: RequestRepository::new(db),
        }
    }
}
