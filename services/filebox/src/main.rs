use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod credentials;
mod error;
mod jwt;
mod middleware;
mod models;
mod password;
mod repositories;
mod routes;
mod state;
mod storage;
mod validation;

use common::database::{self, DatabaseConfig};

use crate::{
    config::AppConfig,
    credentials::CredentialService,
    jwt::{JwtConfig, JwtService},
    repositories::{MongoPostRepository, MongoUserRepository},
    state::AppState,
    storage::FileStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Filebox service");

    let app_config = AppConfig::from_env()?;
    let jwt_config = JwtConfig::from_env()?;

    // The driver connects lazily; only a malformed URI is fatal here
    let db_config = DatabaseConfig::from_env()?;
    let db = database::connect(&db_config).await?;

    match database::health_check(&db).await {
        Ok(_) => {
            info!("Database connection successful");
            if let Err(e) = database::ensure_indexes(&db).await {
                warn!("Failed to ensure database indexes: {}", e);
            }
        }
        Err(e) => error!("Error connecting to the database, serving anyway: {}", e),
    }

    let user_repository = Arc::new(MongoUserRepository::new(&db));
    let post_repository = Arc::new(MongoPostRepository::new(&db));
    let credentials = CredentialService::new(user_repository.clone(), JwtService::new(jwt_config));
    let file_store = FileStore::new(&app_config.upload_dir);

    let app_state = AppState {
        credentials,
        user_repository,
        post_repository,
        file_store,
    };

    info!("Storing uploads in {}", app_state.file_store.root().display());

    // Start the web server
    let app = routes::create_router(app_state);

    let address = app_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Filebox service listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down Filebox service");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
