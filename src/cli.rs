// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The short flags (-u, -o, -r, -s, -c) are the ones site owners already use
// in their migration scripts, so they stay stable. Everything after them is
// tuning with defaults that fit a stock InfoGlue installation.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "infoglue2md",
    version = "0.1.0",
    about = "Convert a whole InfoGlue site (or a subtree of it) to Markdown",
    long_about = "infoglue2md crawls every page below the given URL, converts the main \
                  <article> of each page to Markdown with a Jekyll header and downloads \
                  the images and attachments the pages refer to.",
    after_help = "Example usage:\n  \
                  infoglue2md -u http://my.url/ -o new_web/\n  \
                  infoglue2md -u http://my.url/sub/folder -o new_web/ -s -c -r"
)]
pub struct Cli {
    /// The base URL of the InfoGlue site to convert
    ///
    /// Only pages on the same host and below this path are crawled
    #[arg(short = 'u', long = "url")]
    pub url: String,

    /// Output folder to put the pages in
    #[arg(short = 'o', long = "outputdir")]
    pub output: PathBuf,

    /// Print all rejected URLs, why they were rejected and where they were first seen
    #[arg(short = 'r', long)]
    pub rejected: bool,

    /// Suppress the progress reporting while running
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Print all converted URLs and where they were first seen
    #[arg(short = 'c', long)]
    pub converted: bool,

    /// Print the reports as JSON instead of tab-separated lines
    #[arg(long)]
    pub json: bool,

    /// Element holding the page content, everything outside it is dropped
    #[arg(long, default_value = "article")]
    pub content_tag: String,

    /// Path prefix under which the site stores its images and attachments
    #[arg(long, default_value = "/digitalAssets")]
    pub asset_prefix: String,

    /// Layout name written into the front-matter of every page
    #[arg(long, default_value = "two_puff")]
    pub layout: String,

    /// Request timeout in seconds for pages and assets
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "infoglue2md", "-u", "http://my.url/sub", "-o", "out", "-s", "-c", "-r",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://my.url/sub");
        assert_eq!(cli.output, PathBuf::from("out"));
        assert!(cli.silent && cli.converted && cli.rejected);
        assert!(!cli.json);
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["infoglue2md", "--url", "http://my.url/", "--outputdir", "out"])
            .unwrap();

        assert_eq!(cli.content_tag, "article");
        assert_eq!(cli.asset_prefix, "/digitalAssets");
        assert_eq!(cli.layout, "two_puff");
        assert_eq!(cli.timeout, 10);
    }

    #[test]
    fn test_url_and_output_are_required() {
        assert!(Cli::try_parse_from(["infoglue2md", "-o", "out"]).is_err());
        assert!(Cli::try_parse_from(["infoglue2md", "-u", "http://my.url/"]).is_err());
    }
}
