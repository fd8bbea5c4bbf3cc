//! Span plugins: inline rewrites applied to one block's text at a time.
//!
//! Recognized constructs become placeholders. Wrapper constructs (emphasis,
//! links) render their content first and become a single placeholder, so
//! delimiters never pair across a wrapper's boundary.

mod autolink;
mod code;
mod emphasis;
mod escape;
mod html;
mod link;
mod text;

pub use autolink::Autolink;
pub use code::CodeSpan;
pub use emphasis::Emphasis;
pub use escape::Escape;
pub use html::InlineHtml;
pub use link::{Image, Link};
pub use text::{Break, Encode};

use std::borrow::Cow;
use std::collections::HashMap;

/// Whether the byte at `at` follows an odd number of backslashes.
pub(crate) fn is_escaped(text: &str, at: usize) -> bool {
    let slashes = text.as_bytes()[..at]
        .iter()
        .rev()
        .take_while(|b| **b == b'\\')
        .count();
    slashes % 2 == 1
}

/// Balanced `open`/`close` byte pairs of a span, found in one pass.
pub(crate) struct Pairs(HashMap<usize, usize>);

impl Pairs {
    pub fn new(text: &str, open: u8, close: u8) -> Self {
        let mut stack = Vec::new();
        let mut pairs = HashMap::new();
        for (i, b) in text.bytes().enumerate() {
            if b == open {
                stack.push(i);
            } else if b == close
                && let Some(start) = stack.pop()
            {
                pairs.insert(start, i);
            }
        }
        Self(pairs)
    }

    /// Index of the byte closing the opener at `open`.
    pub fn close(&self, open: usize) -> Option<usize> {
        self.0.get(&open).copied()
    }
}

/// Accumulates a rewritten copy of a span while tracking whether anything changed.
pub(crate) struct Splice<'t> {
    source: &'t str,
    out: String,
    copied: usize,
}

impl<'t> Splice<'t> {
    pub fn new(source: &'t str) -> Self {
        Self {
            source,
            out: String::new(),
            copied: 0,
        }
    }

    /// Replaces `source[start..end]` with `replacement`.
    pub fn replace(&mut self, start: usize, end: usize, replacement: &str) {
        if self.out.is_empty() {
            self.out.reserve(self.source.len());
        }
        self.out.push_str(&self.source[self.copied..start]);
        self.out.push_str(replacement);
        self.copied = end;
    }

    pub fn finish(mut self) -> Cow<'t, str> {
        if self.copied == 0 && self.out.is_empty() {
            return Cow::Borrowed(self.source);
        }
        self.out.push_str(&self.source[self.copied..]);
        Cow::Owned(self.out)
    }
}
