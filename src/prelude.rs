//! A "prelude" for users of the `crawldoc` crate.
//!
//! Re-exports the types needed to wire the document middleware into a
//! pipeline and to consume parsed documents downstream.
//!
//! # Example
//!
//! ```
//! use crawldoc::prelude::*;
//! ```

pub use crate::{
    // Core structs
    Body,
    CrawlResult,
    Document,
    DocumentHandle,
    DocumentPlugin,
    PluginManager,
    Response,
    // Core traits
    Filter,
    Plugin,
    // Errors
    DocumentError,
    PluginError,
    // Essential re-export for trait implementation
    async_trait,
};
