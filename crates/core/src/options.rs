//! Conversion options.

use crate::MarkupError;
use serde::{Deserialize, Serialize};

/// Markup flavour emitted by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// HTML fragments.
    Html,
    /// DocBook 5 fragments.
    #[serde(alias = "docBook")]
    DocBook,
}

/// Named plugin set plus output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Plain Markdown with raw HTML, intraword underscores allowed.
    #[default]
    Markdown,
    /// Markdown Extra: tables, definition lists, fences, header ids, strict emphasis.
    Extra,
    /// Extra without raw HTML, rendered as DocBook.
    Apidoc,
}

impl Dialect {
    /// Output format used when none is configured.
    pub const fn default_format(self) -> OutputFormat {
        match self {
            Dialect::Markdown | Dialect::Extra => OutputFormat::Html,
            Dialect::Apidoc => OutputFormat::DocBook,
        }
    }

    /// Whether `_` emphasis is refused inside words.
    pub const fn strict_emphasis(self) -> bool {
        !matches!(self, Dialect::Markdown)
    }
}

/// Stable identifiers of the built-in plugins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginId {
    /// `[id]: href "title"` definitions.
    StripLinkDefs,
    /// Block-level raw HTML.
    HtmlBlocks,
    /// Fenced code blocks.
    FencedCode,
    /// ATX and Setext headers.
    Header,
    /// Pipe tables.
    Table,
    /// Horizontal rules.
    HorizRule,
    /// Bullet and ordered lists.
    List,
    /// Definition lists.
    DefList,
    /// Indented code blocks.
    CodeBlock,
    /// Block quotes.
    BlockQuote,
    /// Paragraph wrapping.
    Paragraph,
    /// Backtick code spans.
    CodeSpan,
    /// Inline HTML tags.
    InlineHtml,
    /// Backslash escapes.
    Escape,
    /// Images.
    Image,
    /// Inline and reference links.
    Link,
    /// `<uri>` and `<email>` links.
    Autolink,
    /// Strong and emphasis.
    Emphasis,
    /// Hard line breaks.
    Break,
    /// `&`, `<` and `>` encoding.
    Encode,
    /// Smart punctuation on the final output.
    Smartypants,
}

/// Options accepted by the document engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertOptions {
    /// Columns per tab stop; also the code block indentation.
    pub tab_width: usize,
    /// Dialect supplying the default plugin set and output format.
    pub dialect: Dialect,
    /// Explicit ordered plugin set; overrides the dialect's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_set: Option<Vec<PluginId>>,
    /// Explicit output format; overrides the dialect's.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<OutputFormat>,
    /// Generate ids for headers that have no `{#id}`.
    pub auto_header_ids: bool,
    /// Largest accepted input, in bytes.
    pub max_input_bytes: usize,
    /// Deepest accepted block nesting.
    pub max_nesting_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            dialect: Dialect::Markdown,
            plugin_set: None,
            output_format: None,
            auto_header_ids: false,
            max_input_bytes: 4 * 1024 * 1024,
            max_nesting_depth: 32,
        }
    }
}

impl ConvertOptions {
    /// Defaults for the given dialect.
    pub fn dialect(dialect: Dialect) -> Self {
        Self {
            dialect,
            ..Self::default()
        }
    }

    /// Parses a JSON options record; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, MarkupError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Output format after applying the dialect default.
    pub fn effective_format(&self) -> OutputFormat {
        self.output_format
            .unwrap_or_else(|| self.dialect.default_format())
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), MarkupError> {
        if self.tab_width == 0 {
            return Err(MarkupError::config("tabWidth must be at least 1"));
        }
        if self.max_nesting_depth == 0 {
            return Err(MarkupError::config("maxNestingDepth must be at least 1"));
        }
        if let Some(set) = &self.plugin_set {
            if set.is_empty() {
                return Err(MarkupError::config("pluginSet must not be empty"));
            }
            for (i, id) in set.iter().enumerate() {
                if set[..i].contains(id) {
                    return Err(MarkupError::config(format!(
                        "plugin {:?} listed more than once",
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}
