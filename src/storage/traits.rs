//! Storage traits and error types
//!
//! This module defines the interface the crawler uses to persist listings and
//! the associated error types.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid name for a listing entry: {0}")]
    InvalidName(String),
}

impl StorageError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result of trying to claim a listing slug
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// The listing was not mirrored yet; its directory now exists
    Claimed(PathBuf),

    /// A directory for the listing already exists
    AlreadyPresent,
}

/// Trait for storage backend implementations
///
/// A listing's presence in the store is the durable "already downloaded"
/// marker. There is no separate manifest. Methods that touch the disk are
/// async so a slow filesystem never stalls other listings in flight.
#[async_trait]
pub trait ListingStore: Send + Sync {
    /// Claims a slug for this run
    ///
    /// Creates the listing's directory unless it already exists. The check and
    /// the creation are one filesystem call, so two workers in one process
    /// never both claim the same slug.
    async fn claim(&self, slug: &str) -> StorageResult<Claim>;

    /// Writes the listing description, returning the path written
    async fn write_description(&self, slug: &str, description: &str) -> StorageResult<PathBuf>;

    /// Returns the path a downloaded file with `name` is stored under
    fn file_path(&self, slug: &str, name: &str) -> StorageResult<PathBuf>;

    /// Removes a claimed listing so a later run retries it
    async fn release(&self, slug: &str) -> StorageResult<()>;
}
