// src/crawl/state.rs
// =============================================================================
// The bookkeeping of one crawl run.
//
// Four collections, all keyed by NormalizedUrl:
// - frontier: discovered but not yet processed, mapped to where it was found
// - seen: everything ever observed (queued, visited or rejected)
// - rejected: URLs that will not become documents, with the reason
// - converted: URLs that were written out as documents
//
// Invariants:
// - A URL enters the frontier at most once, because it enters `seen` at the
//   same moment and `seen` never shrinks
// - Taking a URL out of the frontier removes it for good
// =============================================================================

use std::collections::BTreeMap;

use super::classify::{Classification, NormalizedUrl, Origin, RejectReason, SeenSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub origin: Origin,
    pub reason: RejectReason,
}

#[derive(Debug, Default)]
pub struct CrawlState {
    frontier: BTreeMap<NormalizedUrl, Origin>,
    seen: SeenSet,
    rejected: BTreeMap<NormalizedUrl, Rejection>,
    converted: BTreeMap<NormalizedUrl, Origin>,
}

impl CrawlState {
    /// A fresh state whose frontier holds just the root URL
    pub fn seeded(root: NormalizedUrl) -> Self {
        let mut state = CrawlState::default();
        state.seen.insert(root.clone(), Origin::Root);
        state.frontier.insert(root, Origin::Root);
        state
    }

    // Takes the next URL to process off the frontier
    //
    // The order is whatever the map gives us first (sorted by URL). Nothing
    // in the crawl depends on it; it just keeps runs repeatable.
    pub fn next(&mut self) -> Option<(NormalizedUrl, Origin)> {
        self.frontier.pop_first()
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    pub fn remaining(&self) -> usize {
        self.frontier.len()
    }

    // Applies a classifier verdict for a link found on `found_on`
    //
    // Returns: true if the link was queued
    pub fn record(&mut self, classification: Classification, found_on: &NormalizedUrl) -> bool {
        match classification {
            Classification::NewUrl(url) => {
                let origin = Origin::Page(found_on.clone());
                self.seen.insert(url.clone(), origin.clone());
                self.frontier.insert(url, origin);
                true
            }
            Classification::Rejected(url, reason) => {
                let origin = Origin::Page(found_on.clone());
                self.seen.insert(url.clone(), origin.clone());
                self.rejected.insert(url, Rejection { origin, reason });
                false
            }
            Classification::AlreadySeen(_) => false,
        }
    }

    pub fn mark_converted(&mut self, url: NormalizedUrl, origin: Origin) {
        self.converted.insert(url, origin);
    }

    pub fn mark_failed(&mut self, url: NormalizedUrl, origin: Origin, reason: RejectReason) {
        self.rejected.insert(url, Rejection { origin, reason });
    }

    /// Consumes the state once the frontier is empty
    pub fn finish(self, processed: usize) -> CrawlSummary {
        CrawlSummary {
            seen: self.seen.len(),
            converted: self.converted,
            rejected: self.rejected,
            processed,
        }
    }
}

// What a finished crawl hands back to the caller
#[derive(Debug)]
pub struct CrawlSummary {
    pub converted: BTreeMap<NormalizedUrl, Origin>,
    pub rejected: BTreeMap<NormalizedUrl, Rejection>,
    /// Number of URLs taken off the frontier
    pub processed: usize,
    /// Size of the seen-set at the end of the run
    pub seen: usize,
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why BTreeMap for the frontier and not VecDeque?
//    - The frontier has to remember where each URL came from, so it is a map
//    - pop_first() gives us "take any one entry" in a stable order
//
// 2. Why is `seen` a HashMap while the others are BTreeMaps?
//    - `seen` is only ever asked "is this URL in here?"
//    - The others are printed as sorted reports at the end
//
// 3. Why does record() clone the URL?
//    - The same URL is a key in two maps (seen + frontier or rejected)
//    - Each map owns its keys, so each needs its own copy
// -----------------------------------------------------------------------------
