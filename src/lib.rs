//! # crawldoc
//!
//! Middleware for spider-style crawlers that attaches a **lazily parsed,
//! queryable document** to each eligible crawl result.
//!
//! ## Overview
//!
//! The crawling engine owns fetching; this crate owns the question "what does
//! that page say?" without paying for an answer nobody asked for. The
//! [`DocumentPlugin`] middleware checks each result's content type and status
//! code against configurable filters. When both pass, it attaches a
//! [`DocumentHandle`] to the result. The handle does nothing until someone
//! calls [`DocumentHandle::get`]: the first call drains the body stream,
//! parses it exactly once, and memoizes the outcome; every caller, whether
//! queued before resolution or arriving after, observes the same parsed
//! document (or the same failure).
//!
//! ## Key Components
//!
//! - **DocumentPlugin**: the middleware gating and attaching the handle
//! - **DocumentHandle**: the lazy, parse-once, fan-out accessor
//! - **Filter**: pluggable content-type / status-code predicates
//! - **PluginManager**: runs results through the registered pipeline stages
//!
//! ## Example
//!
//! ```rust,ignore
//! use crawldoc::prelude::*;
//!
//! let plugin = DocumentPlugin::new();
//! plugin.enable();
//!
//! let mut manager = PluginManager::new();
//! manager.add_plugin(Box::new(plugin));
//!
//! let result = manager
//!     .process_result(result)
//!     .await?
//!     .expect("document plugin never drops results");
//!
//! if let Some(handle) = result.document() {
//!     let doc = handle.get().await?;
//!     println!("title: {}", doc.text("title")?);
//! }
//! ```

pub mod body;
pub mod cell;
pub mod document;
pub mod error;
pub mod filter;
pub mod plugin;
pub mod prelude;
pub mod result;

pub use body::{Body, BodySender};
pub use cell::{DocumentHandle, DocumentResult};
pub use document::Document;
pub use error::{BodyError, DocumentError, PluginError};
pub use filter::{AcceptAll, Filter, FnFilter};
pub use plugin::{DocumentPlugin, Plugin, PluginAction, PluginManager, SharedPluginManager};
pub use result::{CrawlResult, Response};

pub use async_trait::async_trait;
