//! Smart punctuation on rendered output (quotes, dashes, ellipses).

use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

/// Elements whose text is left verbatim.
const VERBATIM: &[&str] = &[
    "code",
    "pre",
    "script",
    "style",
    "literal",
    "programlisting",
    "screen",
];

/// Curly quotes, en/em dashes and ellipses outside code elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct Smartypants;

impl Plugin for Smartypants {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "smartypants",
            phases: &[Phase::Cleanup],
            special_chars: "",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        _ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        Ok(educate(text))
    }
}

fn educate(input: &str) -> Cow<'_, str> {
    if !input.contains(['"', '\'', '-']) && !input.contains("...") {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut verbatim = 0usize;

    while let Some(c) = chars.next() {
        if c == '<' {
            copy_tag(&mut chars, &mut out, &mut verbatim);
        } else if verbatim > 0 {
            out.push(c);
        } else {
            punctuate(c, &mut chars, &mut out);
        }
    }

    Cow::Owned(out)
}

/// Copies one tag and tracks how many verbatim elements are open.
fn copy_tag(chars: &mut Peekable<Chars<'_>>, out: &mut String, verbatim: &mut usize) {
    let mut tag = String::from("<");
    for n in chars.by_ref() {
        tag.push(n);
        if n == '>' {
            break;
        }
    }

    let lower = tag.to_ascii_lowercase();
    let (closing, name) = match lower[1..].strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, &lower[1..]),
    };
    let name_len = name
        .bytes()
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if VERBATIM.contains(&&name[..name_len]) {
        if closing {
            *verbatim = verbatim.saturating_sub(1);
        } else if !lower.ends_with("/>") {
            *verbatim += 1;
        }
    }
    out.push_str(&tag);
}

fn punctuate(c: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    let opening =
        |s: &str| s.is_empty() || s.ends_with(|c: char| c.is_whitespace() || "([{\"'>".contains(c));

    match c {
        '-' if chars.peek() == Some(&'-') => {
            chars.next();
            if chars.peek() == Some(&'-') {
                chars.next();
                out.push('\u{2014}');
            } else {
                out.push('\u{2013}');
            }
        }
        '.' if chars.peek() == Some(&'.') && chars.clone().nth(1) == Some('.') => {
            chars.next();
            chars.next();
            out.push('\u{2026}');
        }
        '"' => out.push(if opening(out) { '\u{201c}' } else { '\u{201d}' }),
        '\'' => out.push(if opening(out) { '\u{2018}' } else { '\u{2019}' }),
        _ => out.push(c),
    }
}
