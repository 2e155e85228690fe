//! Local disk storage for uploaded files
//!
//! Files live at `<root>/<userId>/<timestampMillis>-<originalName>`.

use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

const FALLBACK_NAME: &str = "unnamed";
const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid path segment: {0}")]
    InvalidName(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written by [`FileStore::store`]
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub filename: String,
    pub path: String,
    pub mime_type: String,
}

/// Writes, reads and removes uploads below a root directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a user's uploads, created on demand
    pub async fn user_dir(&self, user_id: &str) -> Result<PathBuf, StorageError> {
        let dir = self.root.join(checked_segment(user_id)?);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Write an upload into the user's directory
    ///
    /// `content_type` is whatever the client declared for the part; when it
    /// is missing the type is guessed from the file extension.
    pub async fn store(
        &self,
        user_id: &str,
        bytes: &[u8],
        original_name: &str,
        content_type: Option<&str>,
    ) -> Result<StoredFile, StorageError> {
        let dir = self.user_dir(user_id).await?;
        let filename = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            base_name(original_name)
        );
        let path = dir.join(&filename);

        fs::write(&path, bytes).await?;
        info!("Stored {} bytes at {}", bytes.len(), path.display());

        let mime_type = match content_type {
            Some(declared) if !declared.is_empty() => declared.to_string(),
            _ => mime_guess::from_path(original_name)
                .first_raw()
                .unwrap_or(FALLBACK_MIME)
                .to_string(),
        };

        Ok(StoredFile {
            filename,
            path: path.to_string_lossy().into_owned(),
            mime_type,
        })
    }

    /// Remove a stored file; fails when it is missing or cannot be removed
    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        fs::remove_file(path).await?;
        info!("Deleted {}", path);
        Ok(())
    }

    /// Path of a stored file for serving, if the segments are safe
    pub fn resolve(&self, user_id: &str, filename: &str) -> Result<PathBuf, StorageError> {
        Ok(self
            .root
            .join(checked_segment(user_id)?)
            .join(checked_segment(filename)?))
    }
}

/// Final component of a client-supplied filename
fn base_name(original_name: &str) -> String {
    let normalized = original_name.replace('\\', "/");
    match normalized.rsplit('/').next() {
        Some(name) if !name.is_empty() && name != "." && name != ".." => name.to_string(),
        _ => FALLBACK_NAME.to_string(),
    }
}

fn checked_segment(segment: &str) -> Result<&str, StorageError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\'])
    {
        return Err(StorageError::InvalidName(segment.to_string()));
    }
    Ok(segment)
}
