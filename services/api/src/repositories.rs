//! Repositories for database operations

pub mod event;
pub mod request;

pub use event::EventRepository;
pub use request::RequestRepository;
