//! Markup renderer strategy.
//!
//! Plugins recognize Markdown constructs and ask a [`Markup`] implementation
//! for the final strings, so one plugin serves every output format. Content
//! arguments are already-rendered markup (possibly containing placeholders);
//! raw arguments (`code`, `href`, `alt`, …) are escaped by the renderer.

use crate::options::OutputFormat;

/// Kind of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `*`, `+` or `-` markers.
    Bullet,
    /// `1.` markers.
    Ordered,
}

/// Column alignment taken from a table delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// No colon.
    #[default]
    None,
    /// `:---`
    Left,
    /// `:--:`
    Center,
    /// `---:`
    Right,
}

impl Align {
    /// Attribute value, if any.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Align::None => None,
            Align::Left => Some("left"),
            Align::Center => Some("center"),
            Align::Right => Some("right"),
        }
    }
}

/// A table whose cells are already rendered.
#[derive(Debug, Clone, Default)]
pub struct TableMarkup {
    /// Per-column alignment; its length is the column count.
    pub aligns: Vec<Align>,
    /// Header cells, one per column.
    pub header: Vec<String>,
    /// Body rows, each exactly one cell per column.
    pub rows: Vec<Vec<String>>,
}

/// One `term`/`definition` group of a definition list.
#[derive(Debug, Clone, Default)]
pub struct Definition {
    /// Rendered terms.
    pub terms: Vec<String>,
    /// Rendered definitions.
    pub definitions: Vec<String>,
}

/// Emits final markup for one output format.
pub trait Markup: Send + Sync {
    /// Output format this renderer produces.
    fn format(&self) -> OutputFormat;

    /// A paragraph around rendered inline content.
    fn paragraph(&self, content: &str) -> String;

    /// Inline content of a tight list item or definition.
    fn tight_block(&self, content: &str) -> String;

    /// A heading of `level` 1..=6.
    fn heading(&self, level: u8, id: Option<&str>, content: &str) -> String;

    /// A thematic break.
    fn rule(&self) -> String;

    /// A literal code block; `code` is raw text.
    fn code_block(&self, language: Option<&str>, code: &str) -> String;

    /// A block quote around rendered blocks.
    fn blockquote(&self, content: &str) -> String;

    /// A list of rendered items.
    fn list(&self, kind: ListKind, start: Option<u64>, items: &[String]) -> String;

    /// A definition list.
    fn definition_list(&self, entries: &[Definition]) -> String;

    /// A table.
    fn table(&self, table: &TableMarkup) -> String;

    /// Opening and closing tags around emphasized content.
    fn emphasis(&self, strong: bool) -> (&'static str, &'static str);

    /// A code span; `code` is raw text.
    fn code_span(&self, code: &str) -> String;

    /// Opening and closing tags of a link; `href` and `title` are raw.
    fn link(&self, href: &str, title: Option<&str>) -> (String, String);

    /// An image; all arguments are raw.
    fn image(&self, src: &str, alt: &str, title: Option<&str>) -> String;

    /// A hard line break.
    fn line_break(&self) -> &'static str;

    /// Escapes raw text.
    fn escape_text(&self, text: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_attribute_values() {
        assert_eq!(Align::None.as_str(), None);
        assert_eq!(Align::Left.as_str(), Some("left"));
        assert_eq!(Align::Center.as_str(), Some("center"));
        assert_eq!(Align::Right.as_str(), Some("right"));
    }
}
