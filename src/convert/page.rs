// src/convert/page.rs
// =============================================================================
// The small slice of an HTML document the crawler and the converter need.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Nothing outside this file touches scraper's document type. The rest of the
// program only sees the PageTree trait: "give me the links" and "give me the
// markup of the first <tag>".
// =============================================================================

use scraper::{Html, Selector};

pub trait PageTree {
    /// The raw href of every <a href="..."> in document order
    fn links(&self) -> Vec<String>;

    /// Outer HTML of the first element matching `tag`, if there is one
    fn first_element_html(&self, tag: &str) -> Option<String>;
}

pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    // Parses a downloaded page
    //
    // Invalid UTF-8 is replaced rather than rejected; html5ever copes with
    // whatever markup is left.
    pub fn parse(body: &[u8]) -> Self {
        HtmlPage {
            document: Html::parse_document(&String::from_utf8_lossy(body)),
        }
    }
}

impl PageTree for HtmlPage {
    fn links(&self) -> Vec<String> {
        // "a[href]" means "all <a> tags that have an href attribute"
        // The selector is a constant and known to be valid
        let selector = Selector::parse("a[href]").unwrap();

        self.document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }

    fn first_element_html(&self, tag: &str) -> Option<String> {
        let selector = Selector::parse(tag).ok()?;
        self.document.select(&selector).next().map(|element| element.html())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_in_document_order() {
        let page = HtmlPage::parse(
            br#"<html><body>
                <a href="/docs/a">A</a>
                <a name="anchor">no href</a>
                <a href="https://other.example/">B</a>
                <a href="">empty</a>
            </body></html>"#,
        );

        assert_eq!(page.links(), vec!["/docs/a", "https://other.example/", ""]);
    }

    #[test]
    fn test_first_element_html() {
        let page = HtmlPage::parse(
            b"<html><body><nav>menu</nav><article><h1>One</h1></article><article>Two</article></body></html>",
        );

        assert_eq!(
            page.first_element_html("article").as_deref(),
            Some("<article><h1>One</h1></article>")
        );
        assert_eq!(page.first_element_html("main"), None);
    }
}
