// src/convert/document.rs
// =============================================================================
// The pieces of an output document that depend only on text and paths:
// - where on disk a page ends up
// - which title it gets
// - the Jekyll front-matter at the top of the file
// =============================================================================

use std::fmt;
use std::path::{Path, PathBuf};

use super::assets::{AssetRef, FILES_DIR};

// A converted page, as written to disk
#[derive(Debug, Clone)]
pub struct Document {
    pub title: String,
    /// Rendered Markdown with asset references already rewritten
    pub body: String,
    pub assets: Vec<AssetRef>,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The page has no content container element
    MissingContentSection,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingContentSection => write!(f, "missing-content-section"),
        }
    }
}

#[derive(Debug)]
pub enum Conversion {
    Written(Document),
    Skipped(SkipReason),
}

// Where a page and its assets are stored below the output directory
//
// The URL path is mirrored, with the last component naming the file:
//   /docs/sub/page   -> <out>/docs/sub/page.md,  assets in <out>/docs/sub/files/
//   /docs/sub/       -> <out>/docs/sub/sub.md,   assets in <out>/docs/sub/files/
//   /                -> <out>/index.md,          assets in <out>/files/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    pub directory: PathBuf,
    pub files_dir: PathBuf,
    pub document: PathBuf,
}

impl DocumentPaths {
    pub fn new(output_root: &Path, url_path: &str) -> Self {
        let mut components: Vec<&str> = url_path.split('/').collect();
        // The last component is the page itself (empty for a trailing slash)
        components.pop();

        let directory = components
            .into_iter()
            .filter(|segment| is_plain_segment(segment))
            .fold(output_root.to_path_buf(), |dir, segment| dir.join(segment));

        let page_name = url_path
            .split('/')
            .filter(|segment| is_plain_segment(segment))
            .last()
            .unwrap_or("index");

        DocumentPaths {
            files_dir: directory.join(FILES_DIR),
            document: directory.join(format!("{}.md", page_name)),
            directory,
        }
    }
}

// Keeps "." and ".." in a URL from walking out of the output directory
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

// Finds the title of a rendered page
//
// The first line starting with "#" wins. The markers are stripped, and the
// text is capitalized: first letter upper case, the rest lower case.
//
// Examples:
//   "# My Title\n..."         -> "My title"
//   "intro\n### ABOUT US"     -> "About us"
//   "no headings at all"      -> ""
pub fn derive_title(text: &str) -> String {
    match text.lines().find(|line| line.starts_with('#')) {
        Some(line) => capitalize(line.trim_start_matches('#').trim()),
        None => String::new(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// The Jekyll header every document starts with
//
// The title is a YAML single-quoted string, where a quote is written twice.
pub fn front_matter(layout: &str, title: &str) -> String {
    format!(
        "---\nlayout: {}\ntitle: '{}'\n---\n\n",
        layout,
        title.replace('\'', "''")
    )
}
