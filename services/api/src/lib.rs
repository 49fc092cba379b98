//! Song request API service
//!
//! HTTP handlers for the events and song requests resources, backed by
//! PostgreSQL through the `common` crate.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod response;
pub mod routes;
pub mod state;
pub mod validation;
