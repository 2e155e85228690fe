//! Database module for handling MongoDB connections and operations
//!
//! This module provides client configuration, connection setup, health checks
//! and index bootstrapping for the MongoDB database.

use crate::error::{DatabaseError, DatabaseResult};
use bson::{Document, doc};
use mongodb::{
    Client, Database, IndexModel,
    options::{ClientOptions, IndexOptions},
};
use std::{env, time::Duration};
use tracing::info;

/// Collection holding user accounts and their embedded file records
pub const USERS_COLLECTION: &str = "users";

/// Collection holding schema-less post documents
pub const POSTS_COLLECTION: &str = "posts";

/// Database configuration struct
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// MongoDB connection string
    pub uri: String,
    /// Name of the database holding the collections
    pub database_name: String,
    /// Maximum number of connections in the driver pool
    pub max_pool_size: u32,
    /// Server selection timeout in seconds
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    /// Create a new DatabaseConfig from environment variables
    ///
    /// # Environment Variables
    /// - `MONGODB_URI`: MongoDB connection string (default: `mongodb://localhost:27017`)
    /// - `MONGODB_DATABASE`: Database name (default: `testingDb`)
    /// - `MONGODB_MAX_POOL_SIZE`: Maximum pooled connections (default: 10)
    /// - `MONGODB_CONNECTION_TIMEOUT`: Server selection timeout in seconds (default: 30)
    pub fn from_env() -> DatabaseResult<Self> {
        let uri =
            env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        if uri.trim().is_empty() {
            return Err(DatabaseError::Configuration(
                "MONGODB_URI must not be empty".to_string(),
            ));
        }

        let database_name = env::var("MONGODB_DATABASE").unwrap_or_else(|_| "testingDb".to_string());

        let max_pool_size = env::var("MONGODB_MAX_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let connection_timeout = env::var("MONGODB_CONNECTION_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Ok(Self {
            uri,
            database_name,
            max_pool_size,
            connection_timeout,
        })
    }
}

/// Build a MongoDB client and return a handle to the configured database
///
/// The driver connects lazily, so this only fails when the connection string
/// cannot be parsed or resolved. Use [`health_check`] to verify the server is
/// reachable.
///
/// # Arguments
///
/// * `config` - Database configuration
///
/// # Returns
///
/// * `DatabaseResult<Database>` - Database handle or error
pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<Database> {
    info!("Initializing MongoDB client");

    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(|e| DatabaseError::Configuration(format!("Invalid MongoDB URI: {}", e)))?;
    options.app_name = Some("filebox".to_string());
    options.max_pool_size = Some(config.max_pool_size);
    options.server_selection_timeout = Some(Duration::from_secs(config.connection_timeout));

    let client = Client::with_options(options).map_err(DatabaseError::Connection)?;

    Ok(client.database(&config.database_name))
}

/// Check database connectivity
///
/// # Arguments
///
/// * `db` - MongoDB database handle
///
/// # Returns
///
/// * `DatabaseResult<bool>` - True if the server answered the ping
pub async fn health_check(db: &Database) -> DatabaseResult<bool> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(DatabaseError::Connection)?;

    Ok(true)
}

/// Create the indexes the application relies on
///
/// The unique index on `users.email` makes the persistence layer reject
/// duplicate registrations that race past the lookup in the register flow.
pub async fn ensure_indexes(db: &Database) -> DatabaseResult<()> {
    let email_index = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    db.collection::<Document>(USERS_COLLECTION)
        .create_index(email_index)
        .await
        .map_err(DatabaseError::Query)?;

    info!("Ensured unique index on {}.email", USERS_COLLECTION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_database_config_from_env() {
        unsafe {
            std::env::remove_var("MONGODB_URI");
            std::env::remove_var("MONGODB_DATABASE");
        }

        let config = DatabaseConfig::from_env().expect("Failed to create database config");
        assert_eq!(config.uri, "mongodb://localhost:27017");
        assert_eq!(config.database_name, "testingDb");
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.connection_timeout, 30);
    }

    #[test]
    #[serial]
    fn test_database_config_from_env_with_custom_values() {
        unsafe {
            std::env::set_var("MONGODB_URI", "mongodb://db.internal:27018");
            std::env::set_var("MONGODB_DATABASE", "filebox");
            std::env::set_var("MONGODB_MAX_POOL_SIZE", "20");
        }

        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.uri, "mongodb://db.internal:27018");
        assert_eq!(config.database_name, "filebox");
        assert_eq!(config.max_pool_size, 20);

        unsafe {
            std::env::remove_var("MONGODB_URI");
            std::env::remove_var("MONGODB_DATABASE");
            std::env::remove_var("MONGODB_MAX_POOL_SIZE");
        }
    }

    #[test]
    #[serial]
    fn test_database_config_rejects_empty_uri() {
        unsafe {
            std::env::set_var("MONGODB_URI", "  ");
        }

        let result = DatabaseConfig::from_env();
        assert!(matches!(result, Err(DatabaseError::Configuration(_))));

        unsafe {
            std::env::remove_var("MONGODB_URI");
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_malformed_uri() {
        let config = DatabaseConfig {
            uri: "not-a-mongodb-uri".to_string(),
            database_name: "testingDb".to_string(),
            max_pool_size: 1,
            connection_timeout: 1,
        };

        let result = connect(&config).await;
        assert!(matches!(result, Err(DatabaseError::Configuration(_))));
    }
}
