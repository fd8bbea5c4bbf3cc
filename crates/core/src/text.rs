//! Source normalization and line helpers shared by plugins.

use crate::token::{TOKEN_CLOSE, TOKEN_OPEN};

/// Normalizes a source document before the prepare plugins run.
///
/// Line endings become `\n`, placeholder delimiters are removed, tabs are
/// expanded to `tab_width` stops, whitespace-only lines become empty and the
/// text ends with a blank line.
pub fn prepare_source(input: &str, tab_width: usize) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len() + 2);
    for line in normalized.split('\n') {
        let line: String = line
            .chars()
            .filter(|c| *c != TOKEN_OPEN && *c != TOKEN_CLOSE)
            .collect();
        let expanded = detab(&line, tab_width);
        if !expanded.trim().is_empty() {
            out.push_str(&expanded);
        }
        out.push('\n');
    }
    while !out.ends_with("\n\n") {
        out.push('\n');
    }
    out
}

/// Expands tabs to spaces, aligning to multiples of `tab_width` columns.
pub fn detab(line: &str, tab_width: usize) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + tab_width);
    let mut column = 0;
    for c in line.chars() {
        if c == '\t' {
            let pad = tab_width - (column % tab_width);
            out.extend(std::iter::repeat_n(' ', pad));
            column += pad;
        } else {
            out.push(c);
            column += 1;
        }
    }
    out
}

/// Number of leading spaces.
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Whether the line has no visible content.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Removes up to `width` leading spaces.
pub fn outdent(line: &str, width: usize) -> &str {
    let strip = indent_of(line).min(width);
    &line[strip..]
}

/// Joins lines with `\n`, without a trailing newline.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.as_ref());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detab_is_column_aware() {
        assert_eq!(detab("\tx", 4), "    x");
        assert_eq!(detab("ab\tx", 4), "ab  x");
        assert_eq!(detab("abcd\tx", 4), "abcd    x");
        assert_eq!(detab("a\tb\tc", 2), "a b c");
    }

    #[test]
    fn prepare_normalizes_lines() {
        let out = prepare_source("a\r\nb\r  \n\tc", 4);
        assert_eq!(out, "a\nb\n\n    c\n\n");
    }

    #[test]
    fn prepare_strips_placeholder_delimiters() {
        let out = prepare_source("a\u{2}b\u{3}c", 4);
        assert_eq!(out, "abc\n\n");
    }

    #[test]
    fn prepare_keeps_existing_blank_tail() {
        assert_eq!(prepare_source("x\n\n", 4), "x\n\n\n");
        assert_eq!(prepare_source("", 4), "\n\n");
    }

    #[test]
    fn outdent_stops_at_content() {
        assert_eq!(outdent("      x", 4), "  x");
        assert_eq!(outdent("  x", 4), "x");
        assert_eq!(indent_of("   y"), 3);
    }
}
