//! Output module for crawl reporting
//!
//! This module handles the counters recorded while a crawl runs and the
//! summary logged when it ends.

pub mod stats;

pub use stats::{log_statistics, CrawlStatistics};
