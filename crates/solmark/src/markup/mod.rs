//! Output format renderers.

mod docbook;
mod html;

pub use docbook::DocBookMarkup;
pub use html::HtmlMarkup;

use solmark_core::{Markup, OutputFormat};

/// Renderer for `format`.
pub fn renderer_for(format: OutputFormat) -> Box<dyn Markup> {
    match format {
        OutputFormat::Html => Box::new(HtmlMarkup),
        OutputFormat::DocBook => Box::new(DocBookMarkup),
    }
}

/// Escapes a value for a double-quoted attribute.
pub(crate) fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}

/// Escapes `&`, `<` and `>`.
pub(crate) fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}
