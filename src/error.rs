// src/error.rs
// =============================================================================
// Error types for the three layers that can fail:
// - ConfigError: bad command-line input (root URL, content tag, asset prefix)
// - FetchError: HTTP transport problems and failed asset writes
// - ConvertError: rendering, asset download and output file problems
//
// The application edge (main.rs, crawl::run) works with anyhow::Result and
// adds context; these enums are what the individual pieces return.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid root URL '{url}': {reason}")]
    InvalidRootUrl { url: String, reason: String },

    #[error("Unsupported scheme '{0}', only http and https can be crawled")]
    UnsupportedScheme(String),

    #[error("Content tag '{0}' is not a valid element selector")]
    InvalidContentTag(String),

    #[error("Asset prefix '{0}' must be an absolute path such as /digitalAssets")]
    InvalidAssetPrefix(String),
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Markdown rendering failed: {0}")]
    Render(#[source] std::io::Error),

    #[error("Asset download from {url} failed: {source}")]
    Asset {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Could not write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
