//! Append-only storage for submitted drawings.
//!
//! Files are named `drawing-<unix-ms>.<ext>`. Two submissions in the same
//! millisecond share a name and the later one wins.

use std::io;
use std::path::{Path, PathBuf};

use canvas_core::{current_timestamp_ms, DataUrl};
use thiserror::Error;

/// Errors writing images to disk.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage directory could not be created.
    #[error("failed to create image directory {path}: {source}")]
    CreateDir {
        /// Directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The image file could not be written.
    #[error("failed to write image {path}: {source}")]
    Write {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A file written by [`ImageStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    /// Path of the written file.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes: usize,
}

/// Writes drawings under a single directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `dir`. Nothing is touched on disk yet.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::CreateDir`] if creation fails.
    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.dir.clone(),
                source,
            })
    }

    /// Write `image` to a timestamp-named file.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the directory or file cannot be written.
    #[tracing::instrument(name = "store_image", skip(self, image), fields(format = ?image.format))]
    pub async fn save(&self, image: &DataUrl) -> Result<SavedFile, StorageError> {
        self.ensure_dir().await?;

        let path = self.dir.join(format!(
            "drawing-{}.{}",
            current_timestamp_ms(),
            image.format.extension()
        ));
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!(path = %path.display(), bytes = image.bytes.len(), "Image saved");
        Ok(SavedFile {
            path,
            bytes: image.bytes.len(),
        })
    }
}
