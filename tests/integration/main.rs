//! Integration test harness
//!
//! Each submodule drives the public crate API against wiremock servers.

mod crawl_tests;
