// src/config.rs
// =============================================================================
// The crawl configuration, built once from the command line and then passed
// by reference to the crawler, the URL classifier and the document converter.
//
// RootUrl holds the three pieces of the starting URL that every link is
// compared against:
// - scheme: "http" or "https"
// - host: host name plus port when one is given ("127.0.0.1:8080")
// - path: the subtree to stay inside ("/" when the URL has no path)
// =============================================================================

use scraper::Selector;
use std::path::PathBuf;
use std::time::Duration;
use url::{Position, Url};

use crate::cli::Cli;
use crate::crawl::link_path;
use crate::error::ConfigError;

pub const DEFAULT_CONTENT_TAG: &str = "article";
pub const DEFAULT_ASSET_PREFIX: &str = "/digitalAssets";
pub const DEFAULT_LAYOUT: &str = "two_puff";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootUrl {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl RootUrl {
    // Parses and validates the URL given with --url
    //
    // Examples:
    //   "http://site.example/docs"   -> (http, site.example, /docs)
    //   "http://127.0.0.1:8080"      -> (http, 127.0.0.1:8080, /)
    //   "site.example/docs"          -> Err (no scheme, so not absolute)
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidRootUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme(url.scheme().to_string()));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidRootUrl {
                url: raw.to_string(),
                reason: "URL has no host".to_string(),
            });
        }

        // Everything between "://" and the path: host and optional port
        let host = url[Position::BeforeHost..Position::AfterPort].to_string();

        // Url::path() is percent-encoded ("/min%20sida"), while hrefs are
        // compared as written ("/min sida/under"), so take the raw path
        let path = match link_path(raw) {
            "" => "/".to_string(),
            path => path.to_string(),
        };

        Ok(RootUrl {
            scheme: url.scheme().to_string(),
            host,
            path,
        })
    }

    /// scheme://host, the base that absolute asset paths are resolved against
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub root: RootUrl,
    pub output_dir: PathBuf,
    pub content_tag: String,
    pub asset_prefix: String,
    pub layout: String,
    pub timeout: Duration,
    pub silent: bool,
}

impl CrawlConfig {
    /// A configuration with the stock InfoGlue defaults
    pub fn new(root: RootUrl, output_dir: impl Into<PathBuf>) -> Self {
        CrawlConfig {
            root,
            output_dir: output_dir.into(),
            content_tag: DEFAULT_CONTENT_TAG.to_string(),
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            silent: false,
        }
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let root = RootUrl::parse(&cli.url)?;

        if Selector::parse(&cli.content_tag).is_err() {
            return Err(ConfigError::InvalidContentTag(cli.content_tag.clone()));
        }

        let asset_prefix = cli.asset_prefix.trim_end_matches('/');
        if !asset_prefix.starts_with('/') {
            return Err(ConfigError::InvalidAssetPrefix(cli.asset_prefix.clone()));
        }

        Ok(CrawlConfig {
            content_tag: cli.content_tag.clone(),
            asset_prefix: asset_prefix.to_string(),
            layout: cli.layout.clone(),
            timeout: Duration::from_secs(cli.timeout),
            silent: cli.silent,
            ..CrawlConfig::new(root, cli.output.clone())
        })
    }
}
