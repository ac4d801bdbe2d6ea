use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File exceeds maximum size of {limit} bytes")]
    TooLarge { limit: u64 },
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Disk-backed store for uploaded attachment files.
///
/// Files live under a single flat directory with server-generated names and
/// are served back verbatim by the static `/uploads` route.
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
    max_size: u64,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>, max_size: u64) -> Self {
        Self {
            root: root.into(),
            max_size,
        }
    }

    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate a unique storage name, keeping the original extension so the
    /// static file route serves the right content type.
    pub fn storage_name(originalname: &str) -> String {
        match Path::new(originalname).extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => format!("{}.{ext}", Uuid::new_v4()),
            _ => Uuid::new_v4().to_string(),
        }
    }

    /// Public path the stored bytes are served from.
    pub fn url_for(filename: &str) -> String {
        format!("/uploads/{filename}")
    }

    /// Open a new file for chunked writing.
    pub async fn create(&self, filename: &str) -> Result<UploadSink, StorageError> {
        let path = self.root.join(filename);
        let file = tokio::fs::File::create(&path).await?;
        Ok(UploadSink {
            file,
            written: 0,
            max_size: self.max_size,
        })
    }

    /// Remove a stored file. Best effort, used to clean up failed uploads.
    pub async fn remove(&self, filename: &str) {
        if let Err(e) = tokio::fs::remove_file(self.root.join(filename)).await {
            warn!("failed to remove stored file '{filename}': {e}");
        }
    }
}

/// In-progress upload write handle enforcing the per-file size cap.
pub struct UploadSink {
    file: tokio::fs::File,
    written: u64,
    max_size: u64,
}

impl UploadSink {
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.written += chunk.len() as u64;
        if self.written > self.max_size {
            return Err(StorageError::TooLarge {
                limit: self.max_size,
            });
        }
        self.file.write_all(chunk).await?;
        Ok(())
    }

    /// Flush and return the total number of bytes written.
    pub async fn finish(mut self) -> Result<u64, StorageError> {
        self.file.flush().await?;
        Ok(self.written)
    }
}
