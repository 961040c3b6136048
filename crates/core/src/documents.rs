//! Project document storage.
//!
//! Uploaded files are written under a per-project directory
//! (`uploads/projects/{project_id}`) below a configurable root, each with a
//! `<uuid>_<original name>` file name so two uploads never collide.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::DbId;

/// Relative directory (below the storage root) holding per-project uploads.
pub const UPLOADS_DIR: &str = "uploads/projects";

/// Name used when an upload's file name reduces to nothing.
const FALLBACK_FILE_NAME: &str = "file";

/// Scratch file written and removed by [`LocalDocumentStorage`]'s check.
const CHECK_FILE_NAME: &str = ".write-check";

/// A file received from the client, fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Reduce a client-supplied file name to its final path component.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    match base {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        other => other.to_string(),
    }
}

/// Build a collision-resistant storage name for an upload.
pub fn stored_file_name(original: &str) -> String {
    format!("{}_{}", uuid::Uuid::new_v4(), sanitize_file_name(original))
}

/// Relative directory of a project's uploads, using `/` separators.
pub fn project_dir(project_id: DbId) -> String {
    format!("{UPLOADS_DIR}/{project_id}")
}

/// Backend that persists project documents.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Write `data` as `stored_name` in the project's directory, returning the
    /// path relative to the storage root.
    async fn write(
        &self,
        project_id: DbId,
        stored_name: &str,
        data: &[u8],
    ) -> Result<String, CoreError>;

    /// Delete everything stored for a project. A missing directory is not an
    /// error.
    async fn remove_project(&self, project_id: DbId) -> Result<(), CoreError>;

    /// Confirm new documents can be stored.
    async fn check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Local filesystem backend
// ---------------------------------------------------------------------------

/// Stores documents on the local filesystem below `root`.
#[derive(Debug, Clone)]
pub struct LocalDocumentStorage {
    root: PathBuf,
}

impl LocalDocumentStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute (root-joined) directory for a project's files.
    pub fn project_path(&self, project_id: DbId) -> PathBuf {
        self.root.join(project_dir(project_id))
    }
}

#[async_trait]
impl DocumentStorage for LocalDocumentStorage {
    async fn write(
        &self,
        project_id: DbId,
        stored_name: &str,
        data: &[u8],
    ) -> Result<String, CoreError> {
        let dir = self.project_path(project_id);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            CoreError::Storage(format!("Failed to create {}: {e}", dir.display()))
        })?;

        let path = dir.join(stored_name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| CoreError::Storage(format!("Error saving file {stored_name}: {e}")))?;

        Ok(format!("{}/{stored_name}", project_dir(project_id)))
    }

    async fn remove_project(&self, project_id: DbId) -> Result<(), CoreError> {
        let dir = self.project_path(project_id);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(format!(
                "Failed to remove {}: {e}",
                dir.display()
            ))),
        }
    }

    /// Round-trips a scratch file through the uploads directory.
    async fn check(&self) -> Result<(), CoreError> {
        let dir = self.root.join(UPLOADS_DIR);
        let path = dir.join(CHECK_FILE_NAME);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to create {}: {e}", dir.display())))?;
        tokio::fs::write(&path, b"ok")
            .await
            .map_err(|e| CoreError::Storage(format!("{} is not writable: {e}", dir.display())))?;
        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to remove {}: {e}", path.display())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
