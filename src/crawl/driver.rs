// src/crawl/driver.rs
// =============================================================================
// The crawl loop.
//
// How it works:
// 1. Start with the root URL in the frontier
// 2. Take one URL off the frontier and fetch the page
// 3. Classify every link on the page, queueing the new in-scope ones
// 4. Convert the page into a document
// 5. Record the outcome and repeat until the frontier is empty
//
// Everything happens one page at a time: a page is fetched, classified and
// written before the next one is taken off the frontier.
//
// Failures never stop the crawl. A page that cannot be fetched is reported
// as fetch-failed, a page that cannot be converted as conversion-failed.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::classify::{Classification, NormalizedUrl, RejectReason, UrlClassifier};
use super::state::{CrawlState, CrawlSummary};
use crate::config::CrawlConfig;
use crate::convert::{Conversion, DocumentConverter, HtmlPage, PageTree};
use crate::fetch::Fetcher;

// Crawls and converts everything below the configured root URL
//
// Returns: the converted and rejected URLs once the frontier is empty
//
// Errors only come from setting up the HTTP client and the asset pattern;
// once the loop runs, every problem is recorded per page instead.
pub async fn run(config: &CrawlConfig) -> Result<CrawlSummary> {
    let fetcher = Fetcher::new(config.timeout).context("Failed to create HTTP client")?;
    let converter = DocumentConverter::new(config, &fetcher)
        .with_context(|| format!("Invalid asset prefix '{}'", config.asset_prefix))?;
    let classifier = UrlClassifier::new(config.root.clone());

    let mut state = CrawlState::seeded(NormalizedUrl::root(&config.root));
    let mut processed = 0;

    while let Some((url, origin)) = state.next() {
        if !config.silent {
            eprintln!(
                "Done: {}\tRemaining: {}\tProcessing: {}",
                processed,
                state.remaining(),
                url
            );
        }
        processed += 1;

        let body = match fetcher.get(&url.to_string()).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "could not fetch page");
                state.mark_failed(url, origin, RejectReason::FetchFailed);
                continue;
            }
        };

        let page = HtmlPage::parse(&body);
        let queued = harvest_links(&page, &url, &classifier, &mut state);
        debug!(%url, queued, "harvested links");

        match converter.convert(&page, &url).await {
            Ok(Conversion::Written(document)) => {
                debug!(
                    %url,
                    title = %document.title,
                    bytes = document.body.len(),
                    assets = document.assets.len(),
                    file = %document.destination.display(),
                    "converted"
                );
                state.mark_converted(url, origin);
            }
            Ok(Conversion::Skipped(reason)) => {
                warn!(%url, %reason, "page was not converted");
                state.mark_failed(url, origin, RejectReason::ConversionFailed);
            }
            Err(e) => {
                warn!(%url, error = %e, "page conversion failed");
                state.mark_failed(url, origin, RejectReason::ConversionFailed);
            }
        }
    }

    Ok(state.finish(processed))
}

// Classifies every link on `page` and applies the verdicts to the state
//
// Returns: how many links were queued
fn harvest_links(
    page: &impl PageTree,
    page_url: &NormalizedUrl,
    classifier: &UrlClassifier,
    state: &mut CrawlState,
) -> usize {
    let mut queued = 0;

    for link in page.links() {
        let classification = classifier.classify(&link, state.seen());
        match &classification {
            Classification::NewUrl(url) => debug!(%url, "queued"),
            Classification::Rejected(url, reason) => debug!(%url, %reason, "rejected"),
            Classification::AlreadySeen(_) => {}
        }

        if state.record(classification, page_url) {
            queued += 1;
        }
    }

    queued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootUrl;
    use crate::crawl::classify::Origin;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    async fn serve(server: &MockServer, page_path: &str, html: &str) {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .expect(1)
            .mount(server)
            .await;
    }

    fn config(server: &MockServer, output: &std::path::Path) -> CrawlConfig {
        let root = RootUrl::parse(&format!("{}/docs", server.uri())).unwrap();
        let mut config = CrawlConfig::new(root, output);
        config.silent = true;
        config
    }

    #[tokio::test]
    async fn test_crawl_subtree() {
        let server = MockServer::start().await;

        serve(
            &server,
            "/docs",
            r#"<html><body><article><h1>Docs</h1>
                <a href="/docs/a">A</a>
                <a href="/docs/b">B</a>
                <a href="http://elsewhere.example/docs/x">X</a>
                <a href="/news">News</a>
                <a href="/docs/manual.pdf">Manual</a>
                <a href="mailto:webmaster@site.example">Mail</a>
            </article></body></html>"#,
        )
        .await;
        serve(
            &server,
            "/docs/a",
            r#"<article><h1>Page A</h1><a href="/docs">Up</a><a href="/docs/b">B</a><a href="/news">News</a></article>"#,
        )
        .await;
        serve(&server, "/docs/b", "<html><body><p>No article</p></body></html>").await;

        let out = tempfile::tempdir().unwrap();
        let config = config(&server, out.path());
        let summary = run(&config).await.unwrap();

        let url = |p: &str| NormalizedUrl::from_link(p, &config.root);

        // Three in-scope pages, three dequeues (wiremock checks each was fetched once)
        assert_eq!(summary.processed, 3);
        assert!(summary.seen >= 3);

        assert_eq!(summary.converted.len(), 2);
        assert_eq!(summary.converted.get(&url("/docs")), Some(&Origin::Root));
        assert_eq!(
            summary.converted.get(&url("/docs/a")),
            Some(&Origin::Page(url("/docs")))
        );

        let reason = |p: &str| summary.rejected.get(&url(p)).map(|r| r.reason);
        assert_eq!(reason("http://elsewhere.example/docs/x"), Some(RejectReason::WrongHost));
        assert_eq!(reason("/news"), Some(RejectReason::WrongPath));
        assert_eq!(reason("/docs/manual.pdf"), Some(RejectReason::IsAttachment));
        assert_eq!(reason("mailto:webmaster@site.example"), Some(RejectReason::WrongScheme));
        assert_eq!(reason("/docs/b"), Some(RejectReason::ConversionFailed));

        // First sighting wins: /news was first found on the root page
        assert_eq!(
            summary.rejected.get(&url("/news")).map(|r| r.origin.clone()),
            Some(Origin::Page(url("/docs")))
        );

        assert!(out.path().join("docs.md").exists());
        assert!(out.path().join("docs/a.md").exists());
        assert!(!out.path().join("docs/b.md").exists());
    }

    #[tokio::test]
    async fn test_unreachable_page_is_fetch_failed() {
        let server = MockServer::start().await;
        serve(
            &server,
            "/docs",
            r#"<article><h1>Docs</h1><a href="/docs/missing">Missing</a></article>"#,
        )
        .await;

        let out = tempfile::tempdir().unwrap();
        let config = config(&server, out.path());
        let summary = run(&config).await.unwrap();

        let missing = NormalizedUrl::from_link("/docs/missing", &config.root);
        assert_eq!(summary.processed, 2);
        assert_eq!(
            summary.rejected.get(&missing).map(|r| r.reason),
            Some(RejectReason::FetchFailed)
        );
        assert_eq!(summary.converted.len(), 1);
    }

    #[tokio::test]
    async fn test_link_cycle_terminates() {
        let server = MockServer::start().await;
        serve(&server, "/docs", r#"<article><a href="/docs/1">1</a></article>"#).await;
        serve(&server, "/docs/1", r#"<article><a href="/docs/2">2</a></article>"#).await;
        serve(&server, "/docs/2", r#"<article><a href="/docs/1">1</a><a href="/docs">0</a></article>"#).await;

        let out = tempfile::tempdir().unwrap();
        let config = config(&server, out.path());
        let summary = run(&config).await.unwrap();

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.seen, 3);
        assert_eq!(summary.converted.len(), 3);
        assert!(summary.rejected.is_empty());
    }

    #[test]
    fn test_harvest_links_counts_new_urls() {
        let root = RootUrl::parse("http://site.example/docs").unwrap();
        let classifier = UrlClassifier::new(root.clone());
        let page_url = NormalizedUrl::root(&root);
        let mut state = CrawlState::seeded(page_url.clone());

        let page = HtmlPage::parse(
            br#"<a href="/docs/a">a</a><a href="/docs/a#again">a</a><a href="/docs">self</a><a href="/x">x</a>"#,
        );
        let queued = harvest_links(&page, &page_url, &classifier, &mut state);

        assert_eq!(queued, 1);
        assert_eq!(state.remaining(), 2);
        assert_eq!(state.seen().len(), 3);
    }
}
