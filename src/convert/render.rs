// src/convert/render.rs
// =============================================================================
// Turns the HTML of a content container into Markdown.
//
// The rendering itself is done by the `htmd` crate. Two kinds of elements are
// kept as raw HTML instead of being converted:
// - <img>: Markdown image syntax would drop width/height/alt styling
// - <table>: Markdown tables cannot express colspans, nested markup, etc.
//
// How it works:
// 1. Re-parse the markup with scraper and collect the raw HTML of every
//    element that should survive untouched
// 2. Swap each of them for a plain-text placeholder
// 3. Let htmd render the rest
// 4. Put the raw HTML back where the placeholders ended up
//
// htmd never wraps lines, so paragraphs come out as a single line each.
// =============================================================================

use scraper::{Html, Selector};

use crate::error::ConvertError;

pub trait TextRenderer {
    fn render(&self, markup: &str) -> Result<String, ConvertError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub keep_images_raw: bool,
    pub keep_tables_raw: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            keep_images_raw: true,
            keep_tables_raw: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    pub fn new(options: RenderOptions) -> Self {
        MarkdownRenderer { options }
    }

    // Replaces the elements that stay raw with placeholders
    //
    // Returns: the rewritten markup and (placeholder, raw html) pairs
    //
    // Tables go first, so an image inside a kept table travels along with its
    // table instead of getting a placeholder of its own.
    fn shelve_raw_elements(&self, markup: &str) -> (String, Vec<(String, String)>) {
        let fragment = Html::parse_fragment(markup);
        let mut html = fragment.root_element().html();
        let mut shelved: Vec<(String, String)> = Vec::new();

        let mut tags = Vec::new();
        if self.options.keep_tables_raw {
            tags.push("table");
        }
        if self.options.keep_images_raw {
            tags.push("img");
        }

        for tag in tags {
            // Constant selectors, known to be valid
            let selector = Selector::parse(tag).unwrap();

            for element in fragment.select(&selector) {
                let raw = element.html();
                if !html.contains(&raw) {
                    continue;
                }

                let placeholder = format!("XRAWHTML{}X", shelved.len());
                let replacement = if tag == "table" {
                    // Keep tables as blocks of their own
                    format!("<p>{}</p>", placeholder)
                } else {
                    placeholder.clone()
                };

                html = html.replace(&raw, &replacement);
                shelved.push((placeholder, raw));
            }
        }

        (html, shelved)
    }
}

impl TextRenderer for MarkdownRenderer {
    fn render(&self, markup: &str) -> Result<String, ConvertError> {
        let (markup, shelved) = self.shelve_raw_elements(markup);

        let mut text = htmd::convert(&markup).map_err(ConvertError::Render)?;

        for (placeholder, raw) in &shelved {
            text = text.replace(placeholder, raw);
        }

        Ok(text)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why compare against element.html() and not the original markup?
//    - scraper re-serializes the markup (attribute quotes, void tags, ...)
//    - The fragment and its elements are serialized by the same code, so an
//      element's HTML is always a substring of the fragment's HTML
//
// 2. Why "XRAWHTML0X" as placeholder?
//    - Letters and digits only, so htmd has nothing to escape
//    - The trailing X keeps XRAWHTML1X from matching inside XRAWHTML10X
//
// 3. Why a trait?
//    - The converter only needs "markup in, text out"
//    - Another engine can be plugged in without touching the converter
// -----------------------------------------------------------------------------
