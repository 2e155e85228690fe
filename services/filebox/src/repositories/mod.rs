//! Repositories for database operations

use async_trait::async_trait;
use bson::{Bson, oid::ObjectId};

use common::error::DatabaseResult;

use crate::models::{FileRecord, Post, User};

#[cfg(test)]
pub mod memory;
pub mod post;
pub mod user;

pub use post::MongoPostRepository;
pub use user::MongoUserRepository;

/// Storage for user accounts and their embedded file records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with `DatabaseError::Duplicate` when the
    /// email is already taken
    async fn create(&self, user: &User) -> DatabaseResult<ObjectId>;

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    async fn find_by_id(&self, id: ObjectId) -> DatabaseResult<Option<User>>;

    /// Append a file record; returns false when the user does not exist
    async fn push_file(&self, user_id: ObjectId, file: &FileRecord) -> DatabaseResult<bool>;

    /// Remove a file record; returns false when nothing was removed
    async fn pull_file(&self, user_id: ObjectId, file_id: ObjectId) -> DatabaseResult<bool>;
}

/// Storage for schema-less posts
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_all(&self) -> DatabaseResult<Vec<Post>>;

    /// Insert a post and return its `_id`, client-supplied or generated
    async fn create(&self, post: Post) -> DatabaseResult<Bson>;
}
