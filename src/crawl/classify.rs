// src/crawl/classify.rs
// =============================================================================
// This module decides what happens to every link found on a crawled page.
//
// How it works:
// 1. Split the raw href into scheme, host and path
// 2. Fill in whatever is missing from the root URL (relative links)
// 3. Compare the result against the root URL and the set of seen URLs
//
// The classifier never touches the crawl state itself. It only answers
// "new", "already seen" or "rejected because ..."; the crawler applies that
// answer to its frontier and bookkeeping sets.
//
// Order of the checks matters: a URL that has been seen once is never looked
// at again, even if it was rejected the first time and shows up on another
// page now. The first page that mentioned it stays its source.
// =============================================================================

use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::config::RootUrl;

/// Every URL ever observed, mapped to the page that first mentioned it
pub type SeenSet = HashMap<NormalizedUrl, Origin>;

// A URL in the one form that is stored anywhere in the crawl state:
// absolute, with scheme and host always present and a non-empty path.
//
// Query strings and fragments are dropped, so "/a?x=1" and "/a#top" are the
// same page as "/a".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl NormalizedUrl {
    // Builds the normalized form of a raw link
    //
    // Examples (root = http://site.example/docs):
    //   "/docs/page"                -> http://site.example/docs/page
    //   "https://other.example/x"   -> https://other.example/x
    //   "#top"                      -> http://site.example/
    //   "$templateId=4"             -> http://site.example/$templateId=4 (path stays relative)
    pub fn from_link(link: &str, root: &RootUrl) -> Self {
        let parts = split_link(link.trim());

        let scheme = match parts.scheme {
            "" => root.scheme.clone(),
            scheme => scheme.to_ascii_lowercase(),
        };
        let host = match parts.host {
            "" => root.host.clone(),
            host => host.to_ascii_lowercase(),
        };
        let path = match parts.path {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        NormalizedUrl { scheme, host, path }
    }

    /// The normalized form of the root URL itself
    pub fn root(root: &RootUrl) -> Self {
        NormalizedUrl {
            scheme: root.scheme.clone(),
            host: root.host.clone(),
            path: root.path.clone(),
        }
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.starts_with('/') {
            write!(f, "{}://{}{}", self.scheme, self.host, self.path)
        } else {
            write!(f, "{}://{}/{}", self.scheme, self.host, self.path)
        }
    }
}

// Where a URL was first seen: either the page that linked to it, or the
// command line for the root URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Root,
    Page(NormalizedUrl),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Root => write!(f, "root"),
            Origin::Page(url) => write!(f, "{}", url),
        }
    }
}

impl Serialize for Origin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RejectReason {
    /// Link points to another host
    WrongHost,
    /// Not http or https (mailto:, javascript:, ftp:, ...)
    WrongScheme,
    /// Path is not absolute, usually an unrendered InfoGlue template reference
    InvalidPath,
    /// Outside the subtree given on the command line
    WrongPath,
    /// Looks like a file; files are handled as assets during conversion
    IsAttachment,
    /// The page was crawled but could not be turned into a document
    ConversionFailed,
    /// The page could not be downloaded
    FetchFailed,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::WrongHost => "wrong-host",
            RejectReason::WrongScheme => "wrong-scheme",
            RejectReason::InvalidPath => "invalid-path",
            RejectReason::WrongPath => "wrong-path",
            RejectReason::IsAttachment => "is-attachment",
            RejectReason::ConversionFailed => "conversion-failed",
            RejectReason::FetchFailed => "fetch-failed",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// In scope and never seen before: queue it
    NewUrl(NormalizedUrl),
    /// Already queued, visited or rejected: nothing to do
    AlreadySeen(NormalizedUrl),
    /// Out of scope: remember it, but never crawl it
    Rejected(NormalizedUrl, RejectReason),
}

pub struct UrlClassifier {
    root: RootUrl,
    attachment: Regex,
}

impl UrlClassifier {
    pub fn new(root: RootUrl) -> Self {
        UrlClassifier {
            root,
            // Constant pattern, known to be valid
            attachment: Regex::new(r"\.\w+$").expect("attachment pattern is valid"),
        }
    }

    // Classifies one raw href found on a page
    //
    // Parameters:
    //   link: the href attribute exactly as it appears in the HTML
    //   seen: every URL the crawl has observed so far
    //
    // Returns: the normalized URL together with the verdict
    pub fn classify(&self, link: &str, seen: &SeenSet) -> Classification {
        let url = NormalizedUrl::from_link(link, &self.root);

        if seen.contains_key(&url) {
            return Classification::AlreadySeen(url);
        }

        match self.rejection(&url) {
            Some(reason) => Classification::Rejected(url, reason),
            None => Classification::NewUrl(url),
        }
    }

    fn rejection(&self, url: &NormalizedUrl) -> Option<RejectReason> {
        if url.host != self.root.host {
            Some(RejectReason::WrongHost)
        } else if url.scheme != "http" && url.scheme != "https" {
            Some(RejectReason::WrongScheme)
        } else if !url.path.starts_with('/') {
            Some(RejectReason::InvalidPath)
        } else if !url.path.starts_with(&self.root.path) {
            Some(RejectReason::WrongPath)
        } else if self.attachment.is_match(&url.path) {
            Some(RejectReason::IsAttachment)
        } else {
            None
        }
    }
}

// The pieces of a raw link, borrowed from the href string
struct LinkParts<'a> {
    scheme: &'a str,
    host: &'a str,
    path: &'a str,
}

// Splits a link the way generic URI syntax does:
//   scheme ":" "//" authority path "?" query "#" fragment
//
// Unlike Url::parse this also works for relative references ("/a", "a/b",
// "//host/a"), which is what most hrefs on a page are.
fn split_link(link: &str) -> LinkParts<'_> {
    // Query and fragment never take part in a page's identity
    let end = link.find(|c: char| c == '?' || c == '#').unwrap_or(link.len());
    let link = &link[..end];

    let (scheme, rest) = match link.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme, rest),
        _ => ("", link),
    };

    let (host, path) = match rest.strip_prefix("//") {
        Some(authority) => match authority.find('/') {
            Some(slash) => authority.split_at(slash),
            None => (authority, ""),
        },
        None => ("", rest),
    };

    LinkParts { scheme, host, path }
}

// The path of a link exactly as written, without query or fragment
//
// The root URL goes through this too, so the subtree check compares the
// root and every href in the same (undecoded) form.
pub fn link_path(link: &str) -> &str {
    split_link(link.trim()).path
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> RootUrl {
        RootUrl::parse("http://site.example/docs").unwrap()
    }

    fn classifier() -> UrlClassifier {
        UrlClassifier::new(root())
    }

    fn url(s: &str) -> NormalizedUrl {
        NormalizedUrl::from_link(s, &root())
    }

    #[test]
    fn test_subtree_link_is_new() {
        let seen = SeenSet::new();
        let result = classifier().classify("/docs/sub/page", &seen);
        assert_eq!(result, Classification::NewUrl(url("http://site.example/docs/sub/page")));
        assert_eq!(
            url("/docs/sub/page").to_string(),
            "http://site.example/docs/sub/page"
        );
    }

    #[test]
    fn test_relative_link_inherits_root_scheme_and_host() {
        let root = RootUrl::parse("https://site.example:8443/docs").unwrap();
        let normalized = NormalizedUrl::from_link("/docs/page", &root);
        assert_eq!(normalized.scheme, "https");
        assert_eq!(normalized.host, "site.example:8443");

        let protocol_relative = NormalizedUrl::from_link("//site.example:8443/docs/page", &root);
        assert_eq!(protocol_relative, normalized);
    }

    #[test]
    fn test_empty_path_defaults_to_slash() {
        assert_eq!(url("http://site.example").path, "/");
        assert_eq!(url("#top").to_string(), "http://site.example/");
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        assert_eq!(url("/docs/page?lang=sv#intro"), url("/docs/page"));
    }

    #[test]
    fn test_second_sighting_is_already_seen() {
        let classifier = classifier();
        let mut seen = SeenSet::new();

        let first = classifier.classify("/docs/page", &seen);
        let Classification::NewUrl(new_url) = first else {
            panic!("expected a new URL, got {:?}", first);
        };
        seen.insert(new_url.clone(), Origin::Page(url("/docs/a")));

        let second = classifier.classify("http://site.example/docs/page", &seen);
        assert_eq!(second, Classification::AlreadySeen(new_url));
    }

    #[test]
    fn test_rejected_link_stays_memoized() {
        let classifier = classifier();
        let mut seen = SeenSet::new();

        let rejected = url("/other");
        assert_eq!(
            classifier.classify("/other", &seen),
            Classification::Rejected(rejected.clone(), RejectReason::WrongPath)
        );
        seen.insert(rejected.clone(), Origin::Root);

        assert_eq!(
            classifier.classify("/other", &seen),
            Classification::AlreadySeen(rejected)
        );
    }

    #[test]
    fn test_other_host_is_wrong_host() {
        let seen = SeenSet::new();
        for link in [
            "http://other.example/docs/page",
            "ftp://other.example/docs/page",
            "https://other.example/elsewhere.pdf",
        ] {
            assert!(
                matches!(
                    classifier().classify(link, &seen),
                    Classification::Rejected(_, RejectReason::WrongHost)
                ),
                "{} should be wrong-host",
                link
            );
        }
    }

    #[test]
    fn test_non_http_scheme_is_wrong_scheme() {
        let seen = SeenSet::new();
        assert!(matches!(
            classifier().classify("mailto:webmaster@site.example", &seen),
            Classification::Rejected(_, RejectReason::WrongScheme)
        ));
        assert!(matches!(
            classifier().classify("javascript:void(0)", &seen),
            Classification::Rejected(_, RejectReason::WrongScheme)
        ));
    }

    #[test]
    fn test_template_reference_is_invalid_path() {
        let seen = SeenSet::new();
        assert!(matches!(
            classifier().classify("$templateLogic.getPageUrl(4)", &seen),
            Classification::Rejected(_, RejectReason::InvalidPath)
        ));
    }

    #[test]
    fn test_non_ascii_root_keeps_its_subtree() {
        let root = RootUrl::parse("http://site.example/dokument/åäö").unwrap();
        let classifier = UrlClassifier::new(root.clone());
        let seen = SeenSet::new();

        assert_eq!(
            classifier.classify("/dokument/åäö/sida", &seen),
            Classification::NewUrl(NormalizedUrl::from_link("/dokument/åäö/sida", &root))
        );
        assert_eq!(
            NormalizedUrl::root(&root),
            NormalizedUrl::from_link("/dokument/åäö", &root)
        );
    }

    #[test]
    fn test_root_with_space_keeps_its_subtree() {
        let root = RootUrl::parse("http://site.example/min sida").unwrap();
        let classifier = UrlClassifier::new(root.clone());
        let mut seen = SeenSet::new();
        seen.insert(NormalizedUrl::root(&root), Origin::Root);

        assert!(matches!(
            classifier.classify("/min sida/under", &seen),
            Classification::NewUrl(_)
        ));
        // A link back to the root is recognised as the seed
        assert!(matches!(
            classifier.classify("http://site.example/min sida", &seen),
            Classification::AlreadySeen(_)
        ));
    }

    #[test]
    fn test_outside_subtree_is_wrong_path() {
        let seen = SeenSet::new();
        assert!(matches!(
            classifier().classify("/news/today", &seen),
            Classification::Rejected(_, RejectReason::WrongPath)
        ));
    }

    #[test]
    fn test_file_extension_is_attachment() {
        let seen = SeenSet::new();
        for link in ["/docs/report.pdf", "/docs/pic.png", "/docs/sub/archive.tar_gz"] {
            assert!(
                matches!(
                    classifier().classify(link, &seen),
                    Classification::Rejected(_, RejectReason::IsAttachment)
                ),
                "{} should be an attachment",
                link
            );
        }
        // A dot inside the path is fine as long as the last segment has none
        assert!(matches!(
            classifier().classify("/docs/v1.2/page", &seen),
            Classification::NewUrl(_)
        ));
    }

    #[test]
    fn test_reason_codes() {
        assert_eq!(RejectReason::WrongHost.to_string(), "wrong-host");
        assert_eq!(RejectReason::IsAttachment.to_string(), "is-attachment");
        assert_eq!(
            serde_json::to_string(&RejectReason::ConversionFailed).unwrap(),
            "\"conversion-failed\""
        );
    }
}
