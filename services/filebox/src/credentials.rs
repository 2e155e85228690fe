//! Credential service: registration, login and token authentication

use bson::oid::ObjectId;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use common::error::DatabaseError;

use crate::{
    jwt::JwtService,
    models::User,
    password,
    repositories::UserRepository,
    validation::{validate_email, validate_password},
};

/// Failures of the credential flows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User already registered")]
    Conflict,

    #[error("User not found")]
    NotFound,

    #[error("Incorrect password")]
    WrongPassword,

    #[error("Invalid token")]
    InvalidToken,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Internal(String),
}

/// Registers users, verifies credentials and issues/validates tokens
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    jwt_service: JwtService,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    /// Create an account for `email`
    ///
    /// An existing email is a conflict whatever the password; the duplicate
    /// check runs before validation and hashing. The unique index catches
    /// registrations that race past it.
    pub async fn register(&self, email: &str, password: &str) -> Result<ObjectId, AuthError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        validate_email(email).map_err(AuthError::InvalidInput)?;
        validate_password(password).map_err(AuthError::InvalidInput)?;

        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let user = User::new(email, password_hash);
        match self.users.create(&user).await {
            Ok(id) => {
                info!("Registered user {}", id);
                Ok(id)
            }
            Err(DatabaseError::Duplicate(_)) => Err(AuthError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify credentials and issue a token for the matching user
    ///
    /// A stored hash that cannot be parsed never matches.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        let plaintext = password.to_string();
        let stored_hash = user.password.clone();
        let matches =
            tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &stored_hash))
                .await
                .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
                .unwrap_or_else(|e| {
                    error!("Stored hash for user {} is unusable: {}", user.id, e);
                    false
                });

        if !matches {
            return Err(AuthError::WrongPassword);
        }

        let token = self
            .jwt_service
            .generate_token(user.id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        info!(
            "Issued token for user {} valid for {}s",
            user.id,
            self.jwt_service.token_expiry()
        );
        Ok(token)
    }

    /// Resolve the user id a bearer token was issued for
    pub fn authenticate(&self, token: &str) -> Result<ObjectId, AuthError> {
        let claims = self
            .jwt_service
            .validate_token(token)
            .map_err(|_| AuthError::InvalidToken)?;

        ObjectId::parse_str(&claims.id).map_err(|_| AuthError::InvalidToken)
    }
}
