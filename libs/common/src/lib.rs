//! Common library for the Filebox application
//!
//! This crate provides shared persistence plumbing used by the Filebox
//! service: MongoDB connectivity, index bootstrapping and error handling.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, connect, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let db = connect(&config).await?;
//!     let is_healthy = health_check(&db).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
