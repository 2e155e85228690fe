//! Post repository backed by the `posts` collection

use async_trait::async_trait;
use bson::{Bson, doc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};

use common::{
    database::POSTS_COLLECTION,
    error::{DatabaseError, DatabaseResult},
};

use super::PostRepository;
use crate::models::Post;

/// Post repository
#[derive(Clone)]
pub struct MongoPostRepository {
    collection: Collection<Post>,
}

impl MongoPostRepository {
    /// Create a new post repository
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(POSTS_COLLECTION),
        }
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn find_all(&self) -> DatabaseResult<Vec<Post>> {
        let cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(DatabaseError::Query)?;

        cursor
            .try_collect::<Vec<Post>>()
            .await
            .map_err(DatabaseError::Query)
    }

    async fn create(&self, post: Post) -> DatabaseResult<Bson> {
        let result = self
            .collection
            .insert_one(post)
            .await
            .map_err(DatabaseError::from_write)?;

        Ok(result.inserted_id)
    }
}
