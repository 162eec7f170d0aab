// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Stays on the root URL's host and below its path
// - Every URL is looked at once; the first page that links to it is kept
//   as its source for the reports
// - Sequential: one page is fetched and converted before the next
//
// Submodules:
// - classify: normalizes links and decides new / seen / rejected
// - state: frontier, seen-set, rejected and converted URLs
// - driver: the loop tying fetching, classifying and converting together
// =============================================================================

mod classify;
mod driver;
mod state;

// Re-export the public API so callers can write `crawl::run()`
pub use classify::{link_path, Classification, NormalizedUrl, Origin, RejectReason};
pub use driver::run;
pub use state::{CrawlState, CrawlSummary};
