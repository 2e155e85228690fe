//! User repository backed by the `users` collection

use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use mongodb::{Collection, Database};
use tracing::info;

use common::{
    database::USERS_COLLECTION,
    error::{DatabaseError, DatabaseResult},
};

use super::UserRepository;
use crate::models::{FileRecord, User};

/// User repository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    /// Create a new user repository
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: &User) -> DatabaseResult<ObjectId> {
        info!("Creating new user: {}", user.email);

        self.collection
            .insert_one(user)
            .await
            .map_err(DatabaseError::from_write)?;

        Ok(user.id)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        info!("Finding user by email: {}", email);

        self.collection
            .find_one(doc! { "email": email })
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: ObjectId) -> DatabaseResult<Option<User>> {
        info!("Finding user by ID: {}", id);

        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(DatabaseError::Query)
    }

    async fn push_file(&self, user_id: ObjectId, file: &FileRecord) -> DatabaseResult<bool> {
        info!("Attaching file {} to user {}", file.filename, user_id);

        let file = bson::to_bson(file)?;
        let result = self
            .collection
            .update_one(doc! { "_id": user_id }, doc! { "$push": { "files": file } })
            .await
            .map_err(DatabaseError::from_write)?;

        Ok(result.matched_count > 0)
    }

    async fn pull_file(&self, user_id: ObjectId, file_id: ObjectId) -> DatabaseResult<bool> {
        info!("Removing file {} from user {}", file_id, user_id);

        let result = self
            .collection
            .update_one(
                doc! { "_id": user_id },
                doc! { "$pull": { "files": { "_id": file_id } } },
            )
            .await
            .map_err(DatabaseError::from_write)?;

        Ok(result.modified_count > 0)
    }
}
