#![deny(missing_docs)]
//! solmark core: placeholder tokens, link references, the plugin capability
//! and the phase runner shared by every Markdown dialect.

/// Per-conversion state.
pub mod context;
/// Errors and non-fatal diagnostics.
pub mod error;
/// Code fence tracking.
pub mod fence;
/// Link reference table.
pub mod links;
/// Markup renderer strategy.
pub mod markup;
/// Conversion options.
pub mod options;
/// Ordered plugin registry and phase runner.
pub mod pipeline;
/// The plugin capability.
pub mod plugin;
/// Header id generation.
pub mod slug;
/// Source normalization and line helpers.
pub mod text;
/// Placeholder token store.
pub mod token;

pub use context::Context;
pub use error::{Diagnostics, Limit, MarkupError, Warning};
pub use links::{LinkDefinition, LinkTable, normalize_label};
pub use markup::{Align, Definition, ListKind, Markup, TableMarkup};
pub use options::{ConvertOptions, Dialect, OutputFormat, PluginId};
pub use pipeline::{BASE_ESCAPABLE, Pipeline};
pub use plugin::{Descriptor, Phase, Plugin};
pub use slug::{Slugger, slugify, split_header_id};
pub use token::{KEY_LEN, Token, TokenStore};
