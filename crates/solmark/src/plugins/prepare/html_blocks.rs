use solmark_core::fence::fence_mask;
use solmark_core::text::{is_blank, join_lines};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin, Warning};
use std::borrow::Cow;

/// Block-level tags whose contents pass through untouched.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "canvas", "dd", "del", "details", "div", "dl",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "iframe", "ins", "math", "nav", "noscript", "ol", "p", "pre", "script",
    "section", "style", "table", "ul", "video",
];

/// Lifts raw HTML blocks out of the document before block parsing.
///
/// A block starts at column 0 after a blank line with an opening block tag
/// and runs to its balanced closing tag, which must be followed by a blank
/// line. `<hr>` and `<!-- comments -->` are recognized too.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlBlocks;

#[derive(Debug, PartialEq, Eq)]
enum Scan {
    /// Block ends on this line index.
    Block(usize),
    /// Looks like a block but never balanced.
    Unclosed(String),
    NotBlock,
}

impl Plugin for HtmlBlocks {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "html-blocks",
            phases: &[Phase::Prepare],
            special_chars: "",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let lines: Vec<&str> = text.lines().collect();
        let fenced = fence_mask(&lines, ctx.tab_width());
        let mut out = String::with_capacity(text.len());
        let mut changed = false;
        let mut fresh = true;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            if fresh && !fenced[i] && line.starts_with('<') {
                match scan_block(&lines, i) {
                    Scan::Block(end) => {
                        let token = ctx.reserve(join_lines(&lines[i..=end]));
                        out.push_str(&token);
                        out.push('\n');
                        changed = true;
                        i = end + 1;
                        continue;
                    }
                    Scan::Unclosed(tag) => ctx.warn(Warning::UnclosedHtmlBlock { tag }),
                    Scan::NotBlock => {}
                }
            }
            out.push_str(line);
            out.push('\n');
            fresh = is_blank(line) || ctx.is_token(line);
            i += 1;
        }

        Ok(if changed {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(text)
        })
    }
}

fn scan_block(lines: &[&str], start: usize) -> Scan {
    let ends_block = |end: usize| lines.get(end + 1).is_none_or(|next| is_blank(next));

    if lines[start].starts_with("<!--") {
        return match (start..lines.len()).find(|&i| lines[i].contains("-->")) {
            Some(end) if ends_block(end) => Scan::Block(end),
            Some(_) => Scan::NotBlock,
            None => Scan::Unclosed("!--".to_string()),
        };
    }

    let Some(tag) = tag_name(lines[start]) else {
        return Scan::NotBlock;
    };
    if tag == "hr" {
        return if ends_block(start) {
            Scan::Block(start)
        } else {
            Scan::NotBlock
        };
    }
    if !BLOCK_TAGS.contains(&tag.as_str()) {
        return Scan::NotBlock;
    }

    let mut depth = 0usize;
    for (i, line) in lines.iter().enumerate().skip(start) {
        depth = tag_depth(&line.to_ascii_lowercase(), &tag, depth);
        if depth == 0 {
            return if ends_block(i) {
                Scan::Block(i)
            } else {
                Scan::NotBlock
            };
        }
    }
    Scan::Unclosed(tag)
}

/// Lowercased name of the tag opening `line`.
fn tag_name(line: &str) -> Option<String> {
    let rest = line.strip_prefix('<')?;
    let len = rest.bytes().take_while(u8::is_ascii_alphanumeric).count();
    if len == 0 {
        return None;
    }
    Some(rest[..len].to_ascii_lowercase())
}

/// Applies the opening and closing `tag`s found in `line` to `depth`.
fn tag_depth(line: &str, tag: &str, mut depth: usize) -> usize {
    let bytes = line.as_bytes();
    let bounded = |at: usize| bytes.get(at).is_none_or(|b| !b.is_ascii_alphanumeric());
    let mut from = 0;
    while let Some(offset) = line[from..].find('<') {
        let at = from + offset + 1;
        let rest = &line[at..];
        if let Some(name) = rest.strip_prefix('/') {
            if name.starts_with(tag) && bounded(at + 1 + tag.len()) {
                depth = depth.saturating_sub(1);
            }
        } else if rest.starts_with(tag) && bounded(at + tag.len()) {
            depth += 1;
        }
        from = at;
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_div_is_a_block() {
        let lines = ["<div>", "<div>inner</div>", "*text*", "</div>", "", "after"];
        assert_eq!(scan_block(&lines, 0), Scan::Block(3));
    }

    #[test]
    fn closing_tag_must_end_the_block() {
        let lines = ["<div>a</div>", "tail"];
        assert_eq!(scan_block(&lines, 0), Scan::NotBlock);
    }

    #[test]
    fn unknown_and_unclosed_tags() {
        assert_eq!(scan_block(&["<span>x</span>"], 0), Scan::NotBlock);
        assert_eq!(
            scan_block(&["<table>", "<tr>"], 0),
            Scan::Unclosed("table".to_string())
        );
    }

    #[test]
    fn comments_and_rules() {
        assert_eq!(scan_block(&["<!-- a", "b -->", ""], 0), Scan::Block(1));
        assert_eq!(scan_block(&["<hr/>"], 0), Scan::Block(0));
    }

    #[test]
    fn depth_ignores_prefixed_names() {
        assert_eq!(tag_depth("<p><pre></p>", "p", 0), 0);
        assert_eq!(tag_depth("<div class=x>", "div", 0), 1);
        assert_eq!(tag_depth("<divider>", "div", 0), 0);
    }
}
