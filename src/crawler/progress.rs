//! Download progress observation
//!
//! File downloads report byte progress through [`ProgressObserver`]. The
//! crawler itself never renders anything; the binary plugs in
//! [`LoggingProgress`], tests plug in counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Receives byte-level progress for one file download
pub trait ProgressObserver: Send + Sync {
    /// Called once the response headers arrived; `total` is the advertised length
    fn on_start(&self, _total: Option<u64>) {}

    /// Called for every chunk written to disk
    fn on_bytes(&self, n: u64);

    /// Called after the file is complete on disk
    fn on_finish(&self, _bytes: u64) {}
}

/// Observer that ignores all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_bytes(&self, _n: u64) {}
}

/// Bytes between progress lines when the total size is unknown
const UNKNOWN_SIZE_STEP: u64 = 1024 * 1024;

/// Observer that reports progress through `tracing`
///
/// Emits a debug line every tenth of the advertised size (or every MiB when
/// the server sends no length) and one line when the file is complete.
#[derive(Debug)]
pub struct LoggingProgress {
    url: String,
    total: AtomicU64,
    received: AtomicU64,
    next_report: AtomicU64,
}

impl LoggingProgress {
    /// Creates an observer for the download of `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            total: AtomicU64::new(0),
            received: AtomicU64::new(0),
            next_report: AtomicU64::new(UNKNOWN_SIZE_STEP),
        }
    }

    /// Bytes received so far
    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    fn step(&self) -> u64 {
        match self.total.load(Ordering::Relaxed) {
            0 => UNKNOWN_SIZE_STEP,
            total => (total / 10).max(1),
        }
    }
}

impl ProgressObserver for LoggingProgress {
    fn on_start(&self, total: Option<u64>) {
        let total = total.unwrap_or(0);
        self.total.store(total, Ordering::Relaxed);
        self.next_report.store(self.step(), Ordering::Relaxed);
        tracing::debug!("Downloading {} ({} bytes)", self.url, total);
    }

    fn on_bytes(&self, n: u64) {
        let received = self.received.fetch_add(n, Ordering::Relaxed) + n;
        let next = self.next_report.load(Ordering::Relaxed);

        if received >= next {
            self.next_report.store(received + self.step(), Ordering::Relaxed);
            match self.total.load(Ordering::Relaxed) {
                0 => tracing::debug!("{}: {} bytes", self.url, received),
                total => tracing::debug!(
                    "{}: {}% ({}/{} bytes)",
                    self.url,
                    received.saturating_mul(100) / total,
                    received,
                    total
                ),
            }
        }
    }

    fn on_finish(&self, bytes: u64) {
        tracing::info!("Saved {} ({} bytes)", self.url, bytes);
    }
}
