//! In-memory repositories used by route and credential tests

use async_trait::async_trait;
use bson::{Bson, oid::ObjectId};
use std::sync::{
    Mutex,
    atomic::{AtomicBool, Ordering},
};

use common::error::{DatabaseError, DatabaseResult};

use super::{PostRepository, UserRepository};
use crate::models::{FileRecord, Post, User};

#[derive(Default)]
pub struct MemoryUserRepository {
    users: Mutex<Vec<User>>,
    failing_writes: AtomicBool,
}

impl MemoryUserRepository {
    /// Make every later file-list update fail as if the database dropped
    pub fn fail_writes(&self) {
        self.failing_writes.store(true, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn remove(&self, id: ObjectId) {
        self.users.lock().unwrap().retain(|user| user.id != id);
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User) -> DatabaseResult<ObjectId> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(DatabaseError::Duplicate(user.email.clone()));
        }
        users.push(user.clone());
        Ok(user.id)
    }

    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> DatabaseResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn push_file(&self, user_id: ObjectId, file: &FileRecord) -> DatabaseResult<bool> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::Configuration(
                "database unavailable".to_string(),
            ));
        }
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|user| user.id == user_id) {
            Some(user) => {
                user.files.push(file.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_file(&self, user_id: ObjectId, file_id: ObjectId) -> DatabaseResult<bool> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|user| user.id == user_id) else {
            return Ok(false);
        };
        let before = user.files.len();
        user.files.retain(|file| file.id != file_id);
        Ok(user.files.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryPostRepository {
    posts: Mutex<Vec<Post>>,
    /// Simulates an unreachable database
    pub unavailable: bool,
}

impl MemoryPostRepository {
    pub fn unavailable() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            unavailable: true,
        }
    }

    fn check(&self) -> DatabaseResult<()> {
        if self.unavailable {
            return Err(DatabaseError::Configuration(
                "database unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_all(&self) -> DatabaseResult<Vec<Post>> {
        self.check()?;
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn create(&self, mut post: Post) -> DatabaseResult<Bson> {
        self.check()?;
        let id = post
            .get("_id")
            .cloned()
            .unwrap_or_else(|| Bson::ObjectId(ObjectId::new()));
        post.insert("_id", id.clone());
        self.posts.lock().unwrap().push(post);
        Ok(id)
    }
}
