//! Queryable document produced by parsing a response body.
//!
//! ## Overview
//!
//! [`Document`] wraps a parsed [`scraper::Html`] tree and exposes the small
//! query surface downstream consumers actually use: text extraction and
//! attribute lookup by CSS selector. The underlying tree is available through
//! [`Document::html`] for anything richer.
//!
//! One parsed tree is shared across tasks as `Arc<Document>`, so the tree
//! sits behind a mutex: `Html` caches element data in non-`Sync` cells, and
//! the lock serializes queries to keep the wrapper `Send + Sync`.
//!
//! The parser is forgiving in the way browsers are: malformed markup still
//! produces a tree. Failures downstream consumers observe come from the
//! transport (stream error) or from a body that is not UTF-8 text, both
//! surfaced as [`DocumentError`](crate::error::DocumentError) by the accessor.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawldoc::document::Document;
//!
//! let doc = Document::parse("<html><body><p>index</p></body></html>");
//! assert_eq!(doc.text("p")?, "index");
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use scraper::{Html, Selector};

use crate::error::DocumentError;

/// A parsed, queryable document, shareable across tasks.
#[derive(Debug)]
pub struct Document {
    html: Mutex<Html>,
}

impl Document {
    /// Parses markup into a document. HTML and XML-ish markup both yield a
    /// queryable tree.
    pub fn parse(text: &str) -> Self {
        Document {
            html: Mutex::new(Html::parse_document(text)),
        }
    }

    /// Concatenated text content of every element matching `selector`.
    pub fn text(&self, selector: &str) -> Result<String, DocumentError> {
        let selector = parse_selector(selector)?;
        let html = self.lock();
        let mut out = String::new();
        for element in html.select(&selector) {
            out.extend(element.text());
        }
        Ok(out)
    }

    /// Text content of each matching element, one entry per element.
    pub fn texts(&self, selector: &str) -> Result<Vec<String>, DocumentError> {
        let selector = parse_selector(selector)?;
        let html = self.lock();
        Ok(html
            .select(&selector)
            .map(|element| element.text().collect())
            .collect())
    }

    /// Attribute value from the first element matching `selector`, if any.
    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>, DocumentError> {
        let selector = parse_selector(selector)?;
        let html = self.lock();
        Ok(html
            .select(&selector)
            .find_map(|element| element.value().attr(name).map(str::to_owned)))
    }

    /// Locks and returns the underlying parsed tree, for queries this
    /// wrapper does not cover. The lock is held until the guard drops.
    pub fn html(&self) -> MutexGuard<'_, Html> {
        self.lock()
    }

    // Queries are read-only over the tree, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Html> {
        self.html.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|_| DocumentError::Selector(selector.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn text_concatenates_matches() {
        let doc = Document::parse("<html><body><p>index</p><p>!</p></body></html>");
        assert_eq!(doc.text("p").expect("query"), "index!");
        assert_eq!(doc.texts("p").expect("query"), vec!["index", "!"]);
    }

    #[test]
    fn xml_like_markup_is_queryable() {
        let doc = Document::parse(
            "<?xml version=\"1.0\"?><directory><title>XML</title></directory>",
        );
        assert_eq!(doc.text("title").expect("query"), "XML");
    }

    #[test]
    fn attr_returns_first_match() {
        let doc = Document::parse("<html><body><a href=\"/next\">next</a></body></html>");
        assert_eq!(
            doc.attr("a", "href").expect("query"),
            Some("/next".to_owned())
        );
        assert_eq!(doc.attr("a", "rel").expect("query"), None);
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let doc = Document::parse("<p>x</p>");
        assert!(matches!(
            doc.text("p["),
            Err(DocumentError::Selector(_))
        ));
    }

    #[test]
    fn documents_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>(_value: &T) {}

        let doc = Arc::new(Document::parse("<p>shared</p>"));
        assert_send_sync(&doc);

        let moved = Arc::clone(&doc);
        let joined = std::thread::spawn(move || moved.text("p").expect("query"))
            .join()
            .expect("thread");
        assert_eq!(joined, "shared");
        assert_eq!(doc.text("p").expect("query"), "shared");
    }
}
