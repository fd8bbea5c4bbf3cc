#![deny(missing_docs)]
//! solmark: Markdown, Markdown Extra and Apidoc rendered to HTML or DocBook
//! through an ordered pipeline of block and span plugins.

/// Document engine.
pub mod engine;
/// HTML and DocBook renderers.
pub mod markup;
/// Built-in plugins.
pub mod plugins;
/// Dialect plugin sets and pipeline construction.
pub mod registry;

pub use engine::{Conversion, Markdown, convert};
pub use markup::{DocBookMarkup, HtmlMarkup, renderer_for};
pub use registry::{build_pipeline, create_plugin, default_plugins};
pub use solmark_core::{
    ConvertOptions, Diagnostics, Dialect, Limit, MarkupError, OutputFormat, PluginId, Warning,
};
