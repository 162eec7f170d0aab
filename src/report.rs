// src/report.rs
// =============================================================================
// The end-of-run reports printed with --rejected and --converted.
//
// Two formats:
// - tab-separated lines with a "#"-prefixed header (default), easy to feed
//   into sort/cut/awk
// - a JSON array (--json)
//
// Rows are sorted by URL in both formats.
// =============================================================================

use serde::Serialize;

use crate::crawl::{CrawlSummary, Origin, RejectReason};

#[derive(Debug, Serialize)]
pub struct RejectedEntry {
    pub url: String,
    pub reason: RejectReason,
    pub first_seen_on: Origin,
}

#[derive(Debug, Serialize)]
pub struct ConvertedEntry {
    pub url: String,
    pub first_seen_on: Origin,
}

pub fn rejected_entries(summary: &CrawlSummary) -> Vec<RejectedEntry> {
    let mut entries: Vec<RejectedEntry> = summary
        .rejected
        .iter()
        .map(|(url, rejection)| RejectedEntry {
            url: url.to_string(),
            reason: rejection.reason,
            first_seen_on: rejection.origin.clone(),
        })
        .collect();

    entries.sort_by(|a, b| a.url.cmp(&b.url));
    entries
}

pub fn converted_entries(summary: &CrawlSummary) -> Vec<ConvertedEntry> {
    let mut entries: Vec<ConvertedEntry> = summary
        .converted
        .iter()
        .map(|(url, origin)| ConvertedEntry {
            url: url.to_string(),
            first_seen_on: origin.clone(),
        })
        .collect();

    entries.sort_by(|a, b| a.url.cmp(&b.url));
    entries
}

pub fn rejected_tsv(entries: &[RejectedEntry]) -> String {
    let mut out = String::from("#rejected_url\t#reason_for_rejection\t#first_seen_on\n");
    for entry in entries {
        out.push_str(&format!("{}\t{}\t{}\n", entry.url, entry.reason, entry.first_seen_on));
    }
    out
}

pub fn converted_tsv(entries: &[ConvertedEntry]) -> String {
    let mut out = String::from("#converted_url\t#first_seen_on\n");
    for entry in entries {
        out.push_str(&format!("{}\t{}\n", entry.url, entry.first_seen_on));
    }
    out
}
