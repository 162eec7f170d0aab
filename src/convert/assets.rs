// src/convert/assets.rs
// =============================================================================
// Finds and rewrites references to the site's asset storage.
//
// InfoGlue serves every uploaded image and attachment from one path prefix,
// e.g. /digitalAssets/1234/5678_report.pdf. In the rendered Markdown those
// references show up as link targets "(...)" or inside raw <img src="...">.
//
// Contract:
// - find(text): every distinct asset path in the text, in order of first use
// - rewrite(text): the same text with each asset path replaced by
//   "files/<last path segment>"
//
// Both work on the rendered text, so nothing here knows about HTML or
// Markdown syntax beyond two forms of reference:
// - "<prefix/a b.pdf>": a Markdown destination in angle brackets, used when
//   the path contains spaces; everything up to ">" is the path
// - "prefix/pic.png?v=1&amp;w=2": a bare path, ending at whitespace, a quote,
//   a parenthesis or an angle bracket
//
// Raw HTML keeps attribute values escaped, so "&amp;" is unescaped before the
// path is used as a download URL. Query and fragment never reach the file name.
// =============================================================================

use regex::{Captures, Regex};

/// Sub-directory next to each document that holds its assets
pub const FILES_DIR: &str = "files";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// The path as it appears in the text, e.g. /digitalAssets/3/pic.png?v=1&amp;w=2
    pub path: String,
    /// Absolute path to download from, e.g. /digitalAssets/3/pic.png?v=1&w=2
    pub source: String,
    /// Local file name, e.g. pic.png
    pub file_name: String,
}

impl AssetRef {
    /// Where the rewritten document points at
    pub fn local_path(&self) -> String {
        format!("{}/{}", FILES_DIR, self.file_name)
    }
}

pub struct AssetRewriter {
    pattern: Regex,
}

impl AssetRewriter {
    // Parameters:
    //   prefix: absolute path prefix of the asset storage ("/digitalAssets")
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let prefix = regex::escape(prefix.trim_end_matches('/'));
        let pattern = Regex::new(&format!(
            r#"<(?P<wrapped>{prefix}/[^<>\n]+)>|(?P<bare>{prefix}/[^\s"'()<>]+)"#
        ))?;
        Ok(AssetRewriter { pattern })
    }

    pub fn find(&self, text: &str) -> Vec<AssetRef> {
        let mut assets: Vec<AssetRef> = Vec::new();

        for caps in self.pattern.captures_iter(text) {
            let Some(asset) = matched_path(&caps).and_then(asset_ref) else {
                continue;
            };
            if !assets.iter().any(|known| known.source == asset.source) {
                assets.push(asset);
            }
        }

        assets
    }

    pub fn rewrite(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, |caps: &Captures| {
                let Some(asset) = matched_path(caps).and_then(asset_ref) else {
                    return caps[0].to_string();
                };
                if caps.name("wrapped").is_some() {
                    format!("<{}>", asset.local_path())
                } else {
                    asset.local_path()
                }
            })
            .into_owned()
    }
}

fn matched_path<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.name("wrapped")
        .or_else(|| caps.name("bare"))
        .map(|m| m.as_str())
}

// A path ending in "/" names a folder, not a file; those are left alone
fn asset_ref(path: &str) -> Option<AssetRef> {
    let source = path.replace("&amp;", "&");

    let without_query = source
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let file_name = without_query
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())?
        .to_string();

    Some(AssetRef {
        path: path.to_string(),
        source,
        file_name,
    })
}
