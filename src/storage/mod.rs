//! Storage module for mirrored listings
//!
//! This module handles everything written to the destination root:
//! - Claiming a listing directory (the "already downloaded" marker)
//! - Writing listing descriptions
//! - Naming the paths downloaded files are stored under
//! - Releasing a listing whose processing failed

mod directory;
mod traits;

pub use directory::DirectoryStore;
pub use traits::{Claim, ListingStore, StorageError, StorageResult};
