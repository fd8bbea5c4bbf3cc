use super::{Claim, Cursor, next_content, rewrite_blocks};
use solmark_core::text::{indent_of, is_blank, join_lines, outdent};
use solmark_core::{Context, Descriptor, ListKind, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Bullet and ordered lists, nested by indentation.
///
/// Outside a list a list must start a block; inside a list item any line
/// may start a nested one.
#[derive(Debug, Clone, Copy, Default)]
pub struct List;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Marker {
    pub kind: ListKind,
    /// Byte offset where item content starts.
    pub content: usize,
    pub number: Option<u64>,
}

#[derive(Debug, Default)]
struct Item<'a> {
    lines: Vec<&'a str>,
    blank_inside: bool,
    blank_after: bool,
}

impl List {
    fn claim(
        &self,
        cursor: &Cursor<'_>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Claim>, MarkupError> {
        let width = ctx.tab_width();
        if !cursor.fresh && ctx.list_level() == 0 {
            return Ok(None);
        }
        let Some(first) = marker(cursor.line(), width) else {
            return Ok(None);
        };

        let lines = cursor.lines;
        let mut items = vec![Item {
            lines: vec![&cursor.line()[first.content..]],
            ..Item::default()
        }];
        let mut end = cursor.index + 1;

        while end < lines.len() {
            let line = lines[end];
            if is_blank(line) {
                let Some(next) = next_content(lines, end) else {
                    break;
                };
                if indent_of(lines[next]) >= width && !ctx.is_token(lines[next]) {
                    if let Some(item) = items.last_mut() {
                        item.blank_inside = true;
                        item.lines.extend(std::iter::repeat_n("", next - end));
                    }
                    end = next;
                } else if marker(lines[next], width).is_some_and(|m| m.kind == first.kind) {
                    if let Some(item) = items.last_mut() {
                        item.blank_after = true;
                    }
                    end = next;
                } else {
                    break;
                }
                continue;
            }
            if ctx.is_token(line) {
                break;
            }
            match marker(line, width) {
                Some(m) if m.kind == first.kind => items.push(Item {
                    lines: vec![&line[m.content..]],
                    ..Item::default()
                }),
                Some(_) => break,
                None => {
                    if let Some(item) = items.last_mut() {
                        item.lines.push(outdent(line, width));
                    }
                }
            }
            end += 1;
        }

        let mut rendered = Vec::with_capacity(items.len());
        let mut previous_blank = false;
        for item in &items {
            let loose = item.blank_inside || item.blank_after || previous_blank;
            previous_blank = item.blank_after;
            let body = format!("{}\n\n", join_lines(&item.lines));
            let content = ctx.run_item_blocks(&body, !loose)?;
            rendered.push(compact(&content));
        }

        let start = match first.kind {
            ListKind::Ordered => first.number.filter(|n| *n != 1),
            ListKind::Bullet => None,
        };
        let markup = ctx.markup().list(first.kind, start, &rendered);
        Ok(Some(Claim {
            lines: end - cursor.index,
            markup,
        }))
    }
}

impl Plugin for List {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "list",
            phases: &[Phase::Block],
            special_chars: "*+-.",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        rewrite_blocks(text, ctx, |cursor, ctx| self.claim(cursor, ctx))
    }
}

/// Recognizes `* `, `+ `, `- ` or `N. ` indented less than one tab stop.
pub(crate) fn marker(line: &str, tab_width: usize) -> Option<Marker> {
    let indent = indent_of(line);
    if indent >= tab_width {
        return None;
    }
    let rest = &line[indent..];
    let (kind, len, number) = match *rest.as_bytes().first()? {
        b'*' | b'+' | b'-' => (ListKind::Bullet, 1, None),
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if rest.as_bytes().get(digits) != Some(&b'.') {
                return None;
            }
            (ListKind::Ordered, digits + 1, rest[..digits].parse().ok())
        }
        _ => return None,
    };
    let after = &rest[len..];
    let spaces = indent_of(after);
    if spaces == 0 || after.trim().is_empty() {
        return None;
    }
    Some(Marker {
        kind,
        content: indent + len + spaces,
        number,
    })
}

/// Drops blank lines between an item's rendered blocks.
pub(crate) fn compact(content: &str) -> String {
    let lines: Vec<&str> = content
        .trim()
        .lines()
        .filter(|line| !is_blank(line))
        .collect();
    join_lines(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullet_markers() {
        let m = marker("* one", 4).unwrap();
        assert_eq!(m.kind, ListKind::Bullet);
        assert_eq!(&"* one"[m.content..], "one");
        assert!(marker("  -   two", 4).is_some());
        assert!(marker("*emphasis*", 4).is_none());
        assert!(marker("    * code", 4).is_none());
        assert!(marker("-", 4).is_none());
    }

    #[test]
    fn ordered_markers_keep_their_number() {
        let m = marker("12. twelve", 4).unwrap();
        assert_eq!(m.kind, ListKind::Ordered);
        assert_eq!(m.number, Some(12));
        assert_eq!(&"12. twelve"[m.content..], "twelve");
        assert!(marker("1.5 apples", 4).is_none());
        assert!(marker("2024", 4).is_none());
    }

    #[test]
    fn compact_joins_blocks() {
        assert_eq!(compact("a\n\n\nb\n\n"), "a\nb");
    }
}
