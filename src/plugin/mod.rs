//! Plugin contract and pipeline manager.
//!
//! ## Overview
//!
//! A [`Plugin`] is one stage of the crawler's result pipeline: it receives
//! each fetched [`CrawlResult`], may inspect or augment it, and decides
//! whether the pipeline continues. Returning
//! [`PluginAction::Continue`] hands the (possibly modified) result to the
//! next stage; [`PluginAction::Drop`] removes it from the pipeline entirely.
//!
//! Plugins carry an enabled toggle so the host can register them ahead of
//! time and switch them on when the crawl starts; the manager silently skips
//! disabled plugins.
//!
//! ## Key Components
//!
//! - **Plugin**: the trait each pipeline stage implements
//! - **PluginManager**: runs a result through every registered plugin in order
//! - **SharedPluginManager**: `Arc`-wrapped manager for concurrent pipelines
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawldoc::plugin::{DocumentPlugin, PluginManager};
//!
//! let plugin = DocumentPlugin::new();
//! plugin.enable();
//!
//! let mut manager = PluginManager::new();
//! manager.add_plugin(Box::new(plugin));
//!
//! if let Some(result) = manager.process_result(result).await? {
//!     // result.document() is set when the filters passed
//! }
//! ```

mod document_plugin;

pub use document_plugin::DocumentPlugin;

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::sync::RwLock;

use crate::error::PluginError;
use crate::result::CrawlResult;

/// What a plugin decided to do with a result.
pub enum PluginAction {
    /// Hand the result to the next plugin in the pipeline.
    Continue(CrawlResult),
    /// Remove the result from the pipeline.
    Drop,
}

/// One stage of the result pipeline.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Whether the pipeline should currently invoke this plugin.
    fn is_enabled(&self) -> bool;

    /// Switches the plugin on.
    fn enable(&self);

    /// Switches the plugin off.
    fn disable(&self);

    /// Processes one result. Must not block on or consume anything the
    /// result owns unless it takes ownership of it.
    async fn middleware(&self, result: CrawlResult) -> Result<PluginAction, PluginError>;
}

/// Runs results through registered plugins in registration order.
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        PluginManager {
            plugins: Vec::new(),
        }
    }

    /// Registers a plugin at the end of the pipeline.
    pub fn add_plugin(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Threads a result through every enabled plugin.
    ///
    /// Returns `Ok(None)` when a plugin dropped the result.
    pub async fn process_result(
        &self,
        result: CrawlResult,
    ) -> Result<Option<CrawlResult>, PluginError> {
        let mut current = result;

        for plugin in &self.plugins {
            if !plugin.is_enabled() {
                trace!("skipping disabled plugin `{}`", plugin.name());
                continue;
            }
            match plugin.middleware(current).await? {
                PluginAction::Continue(result) => current = result,
                PluginAction::Drop => {
                    debug!("plugin `{}` dropped result", plugin.name());
                    return Ok(None);
                }
            }
        }

        Ok(Some(current))
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A plugin manager that can be shared across pipeline tasks.
pub struct SharedPluginManager {
    manager: Arc<RwLock<PluginManager>>,
}

impl SharedPluginManager {
    /// Wraps a manager for concurrent access.
    pub fn new(manager: PluginManager) -> Self {
        SharedPluginManager {
            manager: Arc::new(RwLock::new(manager)),
        }
    }

    /// Registers a plugin at the end of the pipeline.
    pub async fn add_plugin(&self, plugin: Box<dyn Plugin>) {
        self.manager.write().await.add_plugin(plugin);
    }

    /// Threads a result through every enabled plugin.
    pub async fn process_result(
        &self,
        result: CrawlResult,
    ) -> Result<Option<CrawlResult>, PluginError> {
        self.manager.read().await.process_result(result).await
    }
}

impl Clone for SharedPluginManager {
    fn clone(&self) -> Self {
        SharedPluginManager {
            manager: Arc::clone(&self.manager),
        }
    }
}
