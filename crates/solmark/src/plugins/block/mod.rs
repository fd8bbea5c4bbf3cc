//! Block plugins: line-oriented recognizers run in registration order.
//!
//! Each plugin walks the buffer line by line. When it recognizes a construct
//! it renders it (recursing through the context for nested content) and
//! replaces the claimed lines with a placeholder surrounded by blank lines.
//! Blank lines and placeholder lines are never offered to a recognizer.

mod code;
mod deflist;
mod fenced;
mod header;
mod list;
mod paragraph;
mod quote;
mod rule;
mod table;

pub use code::CodeBlock;
pub use deflist::DefList;
pub use fenced::FencedCode;
pub use header::Header;
pub use list::List;
pub use paragraph::Paragraph;
pub use quote::BlockQuote;
pub use rule::HorizRule;
pub use table::Table;

use solmark_core::text::is_blank;
use solmark_core::{Context, MarkupError};
use std::borrow::Cow;

/// Position of a recognizer within the buffer.
pub(crate) struct Cursor<'a> {
    /// Every line of the buffer.
    pub lines: &'a [&'a str],
    /// Line the recognizer is offered.
    pub index: usize,
    /// Whether the line starts a new block: first line, or after a blank,
    /// placeholder or claimed line.
    pub fresh: bool,
}

impl<'a> Cursor<'a> {
    pub fn line(&self) -> &'a str {
        self.lines[self.index]
    }

    pub fn next_line(&self) -> Option<&'a str> {
        self.lines.get(self.index + 1).copied()
    }
}

/// Lines taken by a recognizer and the markup replacing them.
pub(crate) struct Claim {
    pub lines: usize,
    pub markup: String,
}

/// Offers each content line to `claim` and splices in placeholders for claimed runs.
pub(crate) fn rewrite_blocks<'t, F>(
    text: &'t str,
    ctx: &mut Context<'_>,
    mut claim: F,
) -> Result<Cow<'t, str>, MarkupError>
where
    F: FnMut(&Cursor<'_>, &mut Context<'_>) -> Result<Option<Claim>, MarkupError>,
{
    let lines: Vec<&str> = text.lines().collect();
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut fresh = true;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if is_blank(line) || ctx.is_token(line) {
            out.push_str(line);
            out.push('\n');
            fresh = true;
            i += 1;
            continue;
        }

        let cursor = Cursor {
            lines: &lines,
            index: i,
            fresh,
        };
        if let Some(claimed) = claim(&cursor, ctx)? {
            let token = ctx.reserve(claimed.markup);
            push_block(&mut out, &token);
            i += claimed.lines.max(1);
            fresh = true;
            changed = true;
            continue;
        }

        out.push_str(line);
        out.push('\n');
        fresh = false;
        i += 1;
    }

    Ok(if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(text)
    })
}

fn push_block(out: &mut String, token: &str) {
    if !out.is_empty() && !out.ends_with("\n\n") {
        out.push('\n');
    }
    out.push_str(token);
    out.push_str("\n\n");
}

/// Index of the first non-blank line at or after `from`.
pub(crate) fn next_content(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| !is_blank(lines[i]))
}
