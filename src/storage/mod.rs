//! Document Store
//!
//! Persists uploaded documents to a process-local working directory for the
//! duration of a single request. Every stored file is removed again, either
//! explicitly through [`DocumentStore::release`] or, if the request future is
//! dropped before that happens, by [`UploadedDocument`]'s `Drop` impl.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::types::{AppError, AppResult};

const FILE_PREFIX: &str = "financial_document_";
const FILE_SUFFIX: &str = ".pdf";

/// Handle to one stored upload. Owned by the request that created it.
#[derive(Debug)]
pub struct UploadedDocument {
    pub id: String,
    pub original_filename: String,
    pub storage_path: PathBuf,
    pub size_bytes: u64,
    released: bool,
}

impl UploadedDocument {
    pub fn storage_path_str(&self) -> String {
        self.storage_path.to_string_lossy().into_owned()
    }
}

impl Drop for UploadedDocument {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match std::fs::remove_file(&self.storage_path) {
            Ok(()) => debug!(document_id = %self.id, "Removed document on drop"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(document_id = %self.id, error = %e, "Failed to remove document on drop"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DocumentStore {
    work_dir: PathBuf,
}

impl DocumentStore {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Path a document with the given id is stored at
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.work_dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}"))
    }

    /// Write `bytes` under a freshly generated id.
    pub async fn store(&self, bytes: &[u8], filename: &str) -> AppResult<UploadedDocument> {
        if bytes.is_empty() {
            return Err(AppError::EmptyFile);
        }

        fs::create_dir_all(&self.work_dir).await.map_err(|e| {
            AppError::Processing(format!(
                "Failed to create working directory {}: {}",
                self.work_dir.display(),
                e
            ))
        })?;

        let id = Uuid::new_v4().to_string();
        let storage_path = self.path_for(&id);

        // Construct the handle first so a failed write still cleans up a partial file
        let document = UploadedDocument {
            id,
            original_filename: filename.to_string(),
            storage_path,
            size_bytes: bytes.len() as u64,
            released: false,
        };

        fs::write(&document.storage_path, bytes).await.map_err(|e| {
            AppError::Processing(format!("Failed to store uploaded file: {}", e))
        })?;

        info!(
            document_id = %document.id,
            filename = %document.original_filename,
            size_bytes = document.size_bytes,
            "Stored uploaded document"
        );

        Ok(document)
    }

    /// Remove the stored file. Never fails; problems are only logged.
    pub async fn release(&self, mut document: UploadedDocument) {
        match fs::remove_file(&document.storage_path).await {
            Ok(()) => info!(document_id = %document.id, "Released uploaded document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(document_id = %document.id, "Document already removed")
            }
            Err(e) => warn!(
                document_id = %document.id,
                path = %document.storage_path.display(),
                error = %e,
                "Failed to remove uploaded document"
            ),
        }
        document.released = true;
    }
}
