//! Directory-tree implementation of the listing store
//!
//! Layout:
//!
//! ```text
//! <root>/<slug>/description.txt
//! <root>/<slug>/<file-name>
//! ```

use crate::storage::traits::{Claim, ListingStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores each listing as a directory below a destination root
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    description_file: String,
}

impl DirectoryStore {
    /// Opens a store rooted at `root`, creating the root if needed
    ///
    /// # Arguments
    ///
    /// * `root` - Destination directory for all listings
    /// * `description_file` - File name each listing's description is written to
    pub fn new(root: impl Into<PathBuf>, description_file: impl Into<String>) -> StorageResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| StorageError::io(&root, e))?;

        Ok(Self {
            root,
            description_file: description_file.into(),
        })
    }

    /// Returns the destination root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory for a listing slug
    pub fn listing_dir(&self, slug: &str) -> StorageResult<PathBuf> {
        Ok(self.root.join(checked_name(slug)?))
    }
}

#[async_trait]
impl ListingStore for DirectoryStore {
    async fn claim(&self, slug: &str) -> StorageResult<Claim> {
        let dir = self.listing_dir(slug)?;

        match fs::create_dir(&dir).await {
            Ok(()) => Ok(Claim::Claimed(dir)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(Claim::AlreadyPresent),
            Err(e) => Err(StorageError::io(&dir, e)),
        }
    }

    async fn write_description(&self, slug: &str, description: &str) -> StorageResult<PathBuf> {
        let path = self.listing_dir(slug)?.join(&self.description_file);
        fs::write(&path, description)
            .await
            .map_err(|e| StorageError::io(&path, e))?;
        Ok(path)
    }

    fn file_path(&self, slug: &str, name: &str) -> StorageResult<PathBuf> {
        Ok(self.listing_dir(slug)?.join(checked_name(name)?))
    }

    async fn release(&self, slug: &str) -> StorageResult<()> {
        let dir = self.listing_dir(slug)?;

        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&dir, e)),
        }
    }
}

/// Rejects names that would escape their parent directory
fn checked_name(name: &str) -> StorageResult<&str> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(StorageError::InvalidName(name.to_string()));
    }
    Ok(name)
}
