//! Dialect plugin sets and the factory turning plugin ids into plugins.

use crate::plugins::{block, cleanup, prepare, span};
use solmark_core::{ConvertOptions, Dialect, MarkupError, Pipeline, Plugin, PluginId};

/// Plugins of plain Markdown, in registration order.
pub const MARKDOWN: &[PluginId] = &[
    PluginId::StripLinkDefs,
    PluginId::HtmlBlocks,
    PluginId::Header,
    PluginId::HorizRule,
    PluginId::List,
    PluginId::CodeBlock,
    PluginId::BlockQuote,
    PluginId::Paragraph,
    PluginId::CodeSpan,
    PluginId::InlineHtml,
    PluginId::Escape,
    PluginId::Image,
    PluginId::Link,
    PluginId::Autolink,
    PluginId::Emphasis,
    PluginId::Break,
    PluginId::Encode,
];

/// Markdown Extra: adds fenced code, tables and definition lists.
pub const EXTRA: &[PluginId] = &[
    PluginId::StripLinkDefs,
    PluginId::HtmlBlocks,
    PluginId::FencedCode,
    PluginId::Header,
    PluginId::Table,
    PluginId::HorizRule,
    PluginId::List,
    PluginId::DefList,
    PluginId::CodeBlock,
    PluginId::BlockQuote,
    PluginId::Paragraph,
    PluginId::CodeSpan,
    PluginId::InlineHtml,
    PluginId::Escape,
    PluginId::Image,
    PluginId::Link,
    PluginId::Autolink,
    PluginId::Emphasis,
    PluginId::Break,
    PluginId::Encode,
];

/// Extra without raw HTML passthrough.
pub const APIDOC: &[PluginId] = &[
    PluginId::StripLinkDefs,
    PluginId::FencedCode,
    PluginId::Header,
    PluginId::Table,
    PluginId::HorizRule,
    PluginId::List,
    PluginId::DefList,
    PluginId::CodeBlock,
    PluginId::BlockQuote,
    PluginId::Paragraph,
    PluginId::CodeSpan,
    PluginId::Escape,
    PluginId::Image,
    PluginId::Link,
    PluginId::Autolink,
    PluginId::Emphasis,
    PluginId::Break,
    PluginId::Encode,
];

/// Default plugin set of a dialect.
///
/// ```
/// use solmark::registry::default_plugins;
/// use solmark_core::{Dialect, PluginId};
///
/// assert!(default_plugins(Dialect::Extra).contains(&PluginId::Table));
/// assert!(!default_plugins(Dialect::Apidoc).contains(&PluginId::InlineHtml));
/// ```
pub fn default_plugins(dialect: Dialect) -> &'static [PluginId] {
    match dialect {
        Dialect::Markdown => MARKDOWN,
        Dialect::Extra => EXTRA,
        Dialect::Apidoc => APIDOC,
    }
}

/// Instantiates one plugin, parameterized by the dialect where it matters.
pub fn create_plugin(id: PluginId, dialect: Dialect) -> Box<dyn Plugin> {
    match id {
        PluginId::StripLinkDefs => Box::new(prepare::StripLinkDefs),
        PluginId::HtmlBlocks => Box::new(prepare::HtmlBlocks),
        PluginId::FencedCode => Box::new(block::FencedCode),
        PluginId::Header => Box::new(block::Header {
            explicit_ids: dialect != Dialect::Markdown,
        }),
        PluginId::Table => Box::new(block::Table),
        PluginId::HorizRule => Box::new(block::HorizRule),
        PluginId::List => Box::new(block::List),
        PluginId::DefList => Box::new(block::DefList),
        PluginId::CodeBlock => Box::new(block::CodeBlock),
        PluginId::BlockQuote => Box::new(block::BlockQuote),
        PluginId::Paragraph => Box::new(block::Paragraph),
        PluginId::CodeSpan => Box::new(span::CodeSpan),
        PluginId::InlineHtml => Box::new(span::InlineHtml),
        PluginId::Escape => Box::new(span::Escape),
        PluginId::Image => Box::new(span::Image),
        PluginId::Link => Box::new(span::Link),
        PluginId::Autolink => Box::new(span::Autolink),
        PluginId::Emphasis => Box::new(span::Emphasis {
            strict: dialect.strict_emphasis(),
        }),
        PluginId::Break => Box::new(span::Break),
        PluginId::Encode => Box::new(span::Encode),
        PluginId::Smartypants => Box::new(cleanup::Smartypants),
    }
}

/// Builds the pipeline for `options`: the explicit plugin set if given,
/// otherwise the dialect's.
pub fn build_pipeline(options: &ConvertOptions) -> Result<Pipeline, MarkupError> {
    let ids = options
        .plugin_set
        .as_deref()
        .unwrap_or_else(|| default_plugins(options.dialect));
    let mut pipeline = Pipeline::new();
    for &id in ids {
        pipeline.register_boxed(create_plugin(id, options.dialect))?;
    }
    log::debug!(
        "built {:?} pipeline with {} plugins",
        options.dialect,
        ids.len()
    );
    Ok(pipeline)
}
