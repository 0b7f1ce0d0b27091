use std::fmt;

/// How processing one detail page ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    /// The description and every recognized file were written
    Downloaded {
        /// Number of files written
        files: usize,
        /// Total bytes across those files
        bytes: u64,
    },

    /// The listing directory already existed
    Skipped,

    /// Loading, parsing, writing, or downloading failed
    Failed {
        /// Error description, logged with the detail URL
        error: String,
    },
}

impl ListingOutcome {
    /// Returns true if the listing is now fully mirrored by this run
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }

    /// Returns true if this represents an error
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for ListingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Downloaded { files, bytes } => {
                write!(f, "downloaded {} files ({} bytes)", files, bytes)
            }
            Self::Skipped => write!(f, "skipped"),
            Self::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}
