//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the pagination state machine (awaiting overview page, processing listings, done)
//! - `ListingOutcome`: how processing a single detail page ended

mod crawl_state;
mod listing_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use listing_state::ListingOutcome;
