//! User model and its embedded file records

use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User document as stored in the `users` collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    /// One-way password hash, never the plaintext
    pub password: String,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl User {
    /// Build a fresh account with an empty file list
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            email: email.into(),
            password: password_hash.into(),
            files: Vec::new(),
        }
    }

    /// Look up one of the user's file records by id
    pub fn file(&self, file_id: ObjectId) -> Option<&FileRecord> {
        self.files.iter().find(|file| file.id == file_id)
    }
}

/// Metadata for one uploaded file, embedded in its owning user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub filename: String,
    #[serde(rename = "originalname")]
    pub original_name: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub path: String,
    #[serde(rename = "uploadedAt", with = "chrono_datetime_as_bson_datetime")]
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(
        filename: impl Into<String>,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            filename: filename.into(),
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            path: path.into(),
            uploaded_at: Utc::now(),
        }
    }
}

/// JSON representation of a file record returned by `GET /myfiles`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecordResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub filename: String,
    #[serde(rename = "originalname")]
    pub original_name: String,
    #[serde(rename = "mimetype")]
    pub mime_type: String,
    pub path: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileRecord> for FileRecordResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id.to_hex(),
            filename: record.filename,
            original_name: record.original_name,
            mime_type: record.mime_type,
            path: record.path,
            uploaded_at: record.uploaded_at,
        }
    }
}
