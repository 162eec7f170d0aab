// src/convert/mod.rs
// =============================================================================
// This module turns one crawled page into a Markdown document on disk.
//
// Submodules:
// - page: the PageTree trait and its scraper-backed implementation
// - render: HTML -> Markdown with images and tables kept as raw HTML
// - assets: finding and rewriting /digitalAssets/... references
// - document: output paths, title and front-matter
//
// Steps for one page:
// 1. Find the content container (<article> by default); no container, no file
// 2. Render it to Markdown
// 3. Create <dir>/files/ and download every referenced asset into it
// 4. Point the asset references at files/<name>
// 5. Prepend the front-matter and write <dir>/<page>.md
// =============================================================================

mod assets;
mod document;
mod page;
mod render;

pub use document::{Conversion, Document, SkipReason};
pub use page::{HtmlPage, PageTree};
pub use render::{MarkdownRenderer, RenderOptions, TextRenderer};

use assets::AssetRewriter;
use document::{derive_title, front_matter, DocumentPaths};

use tracing::{debug, info, warn};

use crate::config::CrawlConfig;
use crate::crawl::NormalizedUrl;
use crate::error::ConvertError;
use crate::fetch::Fetcher;

pub struct DocumentConverter<'a, R = MarkdownRenderer> {
    config: &'a CrawlConfig,
    fetcher: &'a Fetcher,
    renderer: R,
    assets: AssetRewriter,
}

impl<'a> DocumentConverter<'a> {
    pub fn new(config: &'a CrawlConfig, fetcher: &'a Fetcher) -> Result<Self, regex::Error> {
        let renderer = MarkdownRenderer::new(RenderOptions::default());
        DocumentConverter::with_renderer(config, fetcher, renderer)
    }
}

impl<'a, R: TextRenderer> DocumentConverter<'a, R> {
    pub fn with_renderer(
        config: &'a CrawlConfig,
        fetcher: &'a Fetcher,
        renderer: R,
    ) -> Result<Self, regex::Error> {
        Ok(DocumentConverter {
            config,
            fetcher,
            renderer,
            assets: AssetRewriter::new(&config.asset_prefix)?,
        })
    }

    // Converts a page and writes it below the output directory
    //
    // Parameters:
    //   page: the parsed page
    //   url: the page's own (normalized) URL, which decides the output path
    //
    // Returns:
    //   Ok(Written): the document was written
    //   Ok(Skipped): the page has no content container, nothing was written
    //   Err: rendering, an asset download or a file write failed
    pub async fn convert(
        &self,
        page: &impl PageTree,
        url: &NormalizedUrl,
    ) -> Result<Conversion, ConvertError> {
        let paths = DocumentPaths::new(&self.config.output_dir, &url.path);

        let Some(content) = page.first_element_html(&self.config.content_tag) else {
            warn!(%url, tag = %self.config.content_tag, "page has no content section, skipping");
            return Ok(Conversion::Skipped(SkipReason::MissingContentSection));
        };

        let text = self.renderer.render(&content)?;

        tokio::fs::create_dir_all(&paths.files_dir)
            .await
            .map_err(|source| ConvertError::Io {
                path: paths.files_dir.clone(),
                source,
            })?;

        let assets = self.assets.find(&text);
        for asset in &assets {
            let asset_url = format!("{}{}", self.config.root.origin(), asset.source);
            let dest = paths.files_dir.join(&asset.file_name);

            let bytes = self
                .fetcher
                .download(&asset_url, &dest)
                .await
                .map_err(|source| ConvertError::Asset {
                    url: asset_url.clone(),
                    source,
                })?;
            debug!(url = %asset_url, dest = %dest.display(), bytes, "downloaded asset");
        }

        let body = self.assets.rewrite(&text);
        let title = derive_title(&body);

        let mut output = front_matter(&self.config.layout, &title);
        output.push_str(&body);

        tokio::fs::write(&paths.document, &output)
            .await
            .map_err(|source| ConvertError::Io {
                path: paths.document.clone(),
                source,
            })?;
        info!(%url, file = %paths.document.display(), assets = assets.len(), "wrote document");

        Ok(Conversion::Written(Document {
            title,
            body,
            assets,
            destination: paths.document,
        }))
    }
}
