//! Application state shared across handlers

use std::sync::Arc;

use crate::{
    credentials::CredentialService,
    repositories::{PostRepository, UserRepository},
    storage::FileStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialService,
    pub user_repository: Arc<dyn UserRepository>,
    pub post_repository: Arc<dyn PostRepository>,
    pub file_store: FileStore,
}
