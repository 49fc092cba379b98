//! Common library for the song request backend
//!
//! This crate provides the database plumbing shared by the services:
//! connection string handling, the lazily created connection pool, schema
//! creation, and the database error type.
//!
//! ```rust,no_run
//! use common::database::{Database, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::from_env();
//!     let pool = db.pool().await?;
//!     let is_healthy = health_check(pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod schema;
