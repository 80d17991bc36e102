//! Crawl result and response types consumed by the middleware pipeline.
//!
//! ## Overview
//!
//! The crawling engine hands each fetched page to the pipeline as a
//! [`CrawlResult`]: the requested URL plus a [`Response`] carrying the status
//! code, headers, and a [`Body`]. This crate adds exactly one thing to that
//! shape — an optional [`DocumentHandle`] — and leaves everything else to the
//! engine. Downstream consumers feature-test with [`CrawlResult::document`]
//! before using the handle, since it is only attached when the configured
//! filters pass.

use std::collections::HashMap;

use url::Url;

use crate::body::Body;
use crate::cell::DocumentHandle;

/// An HTTP-shaped response: status, headers, and a consumable body.
#[derive(Debug)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: Option<Body>,
}

impl Response {
    /// Creates a response from its status code and body.
    pub fn new(status: u16, body: Body) -> Self {
        Response {
            status,
            headers: HashMap::new(),
            body: Some(body),
        }
    }

    /// Adds a header, normalizing the name to lowercase.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// The HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `content-type` header, if the server sent one.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Moves the body out of the response. Returns `None` if something
    /// already claimed it.
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }
}

/// One fetched page moving through the middleware pipeline.
#[derive(Debug)]
pub struct CrawlResult {
    url: Url,
    response: Response,
    document: Option<DocumentHandle>,
}

impl CrawlResult {
    /// Wraps a fetched response for pipeline processing.
    pub fn new(url: Url, response: Response) -> Self {
        CrawlResult {
            url,
            response,
            document: None,
        }
    }

    /// The URL this result was fetched from.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The response as received.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access, for middleware that claims the body.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// The lazy document handle, present only when the document middleware
    /// accepted this result.
    pub fn document(&self) -> Option<&DocumentHandle> {
        self.document.as_ref()
    }

    /// Attaches the lazy document handle.
    pub fn attach_document(&mut self, handle: DocumentHandle) {
        self.document = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let response = Response::new(200, Body::empty())
            .with_header("Content-Type", "text/html; charset=utf-8");
        assert_eq!(
            response.content_type(),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(response.header("CONTENT-TYPE"), response.content_type());
    }

    #[test]
    fn body_can_only_be_taken_once() {
        let mut response = Response::new(200, Body::empty());
        assert!(response.take_body().is_some());
        assert!(response.take_body().is_none());
    }
}
