//! The document middleware itself.
//!
//! ## Overview
//!
//! [`DocumentPlugin`] inspects each crawl result's content type and status
//! code against two configurable [`Filter`]s. When both pass, it moves the
//! response body into a fresh [`DocumentHandle`] and attaches it to the
//! result; when either rejects, the result passes through untouched. The
//! hook itself never reads a byte of the body — buffering and parsing start
//! only if a downstream consumer calls
//! [`DocumentHandle::get`](crate::cell::DocumentHandle::get).
//!
//! Defaults match what a crawler usually wants: any `html` or `xml` content
//! type, any status code. Status codes are matched against their decimal
//! string form, so a `^2` regex restricts the plugin to 2xx responses.
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawldoc::plugin::DocumentPlugin;
//! use regex::Regex;
//!
//! let plugin = DocumentPlugin::new()
//!     .with_status_code_filter(Regex::new("^2")?);
//! plugin.enable();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use log::{debug, trace};

use crate::cell::DocumentHandle;
use crate::error::PluginError;
use crate::filter::{AcceptAll, Filter, default_content_type_filter};
use crate::plugin::{Plugin, PluginAction};
use crate::result::CrawlResult;

/// Middleware attaching a lazy document handle to eligible results.
pub struct DocumentPlugin {
    filter_content_type: Box<dyn Filter>,
    filter_status_code: Box<dyn Filter>,
    enabled: AtomicBool,
}

impl DocumentPlugin {
    /// Creates the plugin with default filters: content type matching
    /// `html|xml`, any status code. Starts disabled; call
    /// [`enable`](Plugin::enable) once registered.
    pub fn new() -> Self {
        DocumentPlugin {
            filter_content_type: Box::new(default_content_type_filter()),
            filter_status_code: Box::new(AcceptAll),
            enabled: AtomicBool::new(false),
        }
    }

    /// Replaces the content-type filter.
    pub fn with_content_type_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter_content_type = Box::new(filter);
        self
    }

    /// Replaces the status-code filter. The filter sees the status code as a
    /// decimal string (`"200"`, `"500"`).
    pub fn with_status_code_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filter_status_code = Box::new(filter);
        self
    }

    fn accepts(&self, result: &CrawlResult) -> bool {
        let response = result.response();
        if !self.filter_content_type.test(response.content_type()) {
            trace!(
                "content type {:?} rejected for {}",
                response.content_type(),
                result.url()
            );
            return false;
        }
        let status = response.status().to_string();
        if !self.filter_status_code.test(Some(status.as_str())) {
            trace!("status {} rejected for {}", status, result.url());
            return false;
        }
        true
    }
}

impl Default for DocumentPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Plugin for DocumentPlugin {
    fn name(&self) -> &str {
        "document"
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    async fn middleware(&self, mut result: CrawlResult) -> Result<PluginAction, PluginError> {
        if !self.accepts(&result) {
            return Ok(PluginAction::Continue(result));
        }
        if let Some(body) = result.response_mut().take_body() {
            debug!("attaching lazy document handle for {}", result.url());
            result.attach_document(DocumentHandle::new(body));
        }
        Ok(PluginAction::Continue(result))
    }
}
