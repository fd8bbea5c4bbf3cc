use solmark_core::fence::fence_mask;
use solmark_core::text::{indent_of, is_blank};
use solmark_core::{Context, Descriptor, LinkDefinition, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Removes `[label]: href "title"` lines and records them in the link table.
///
/// Each definition is replaced by an empty placeholder line so block
/// boundaries stay where the author put them. Fenced code is left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripLinkDefs;

/// A definition spanning `lines` source lines.
#[derive(Debug, PartialEq, Eq)]
struct Parsed<'a> {
    label: &'a str,
    href: &'a str,
    title: Option<&'a str>,
    lines: usize,
}

impl Plugin for StripLinkDefs {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "strip-link-defs",
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
        let mut found = 0;
        let mut i = 0;

        while i < lines.len() {
            if !fenced[i]
                && let Some(def) = parse_definition(&lines[i..])
            {
                ctx.links_mut().insert(
                    def.label,
                    LinkDefinition {
                        href: def.href.to_string(),
                        title: def.title.map(str::to_string),
                    },
                )?;
                let token = ctx.reserve("");
                out.push_str(&token);
                out.push('\n');
                found += 1;
                i += def.lines;
                continue;
            }
            out.push_str(lines[i]);
            out.push('\n');
            i += 1;
        }

        if found == 0 {
            return Ok(Cow::Borrowed(text));
        }
        log::debug!("stripped {} link definitions", found);
        Ok(Cow::Owned(out))
    }
}

fn parse_definition<'a>(lines: &[&'a str]) -> Option<Parsed<'a>> {
    let first = *lines.first()?;
    if indent_of(first) > 3 {
        return None;
    }
    let rest = first.trim_start().strip_prefix('[')?;
    let close = rest.find("]:")?;
    let label = &rest[..close];
    if label.trim().is_empty() || label.contains(['[', ']']) {
        return None;
    }

    let mut used = 1;
    let mut after = rest[close + 2..].trim();
    if after.is_empty() {
        let next = lines.get(1).copied().filter(|line| !is_blank(line))?;
        after = next.trim();
        used = 2;
    }

    let (href, remainder) = split_href(after)?;
    let title = if remainder.is_empty() {
        match lines.get(used).copied().and_then(|line| parse_title(line.trim())) {
            Some(title) => {
                used += 1;
                Some(title)
            }
            None => None,
        }
    } else {
        Some(parse_title(remainder)?)
    };

    Some(Parsed {
        label,
        href,
        title,
        lines: used,
    })
}

/// Splits the target off, accepting `<href>` or a bare word.
fn split_href(text: &str) -> Option<(&str, &str)> {
    if let Some(inner) = text.strip_prefix('<') {
        let end = inner.find('>')?;
        return Some((&inner[..end], inner[end + 1..].trim()));
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let href = &text[..end];
    (!href.is_empty()).then(|| (href, text[end..].trim()))
}

/// A whole `"title"`, `'title'` or `(title)`.
fn parse_title(text: &str) -> Option<&str> {
    let close = match text.chars().next()? {
        '"' => '"',
        '\'' => '\'',
        '(' => ')',
        _ => return None,
    };
    let inner = text[1..].strip_suffix(close)?;
    Some(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_definition() {
        let parsed = parse_definition(&["[1]: http://example.com \"T\""]).unwrap();
        assert_eq!(parsed.label, "1");
        assert_eq!(parsed.href, "http://example.com");
        assert_eq!(parsed.title, Some("T"));
        assert_eq!(parsed.lines, 1);
    }

    #[test]
    fn href_and_title_on_following_lines() {
        let lines = ["  [Docs]:", "  <http://x.test/a b>", "  (Title here)", "next"];
        let parsed = parse_definition(&lines).unwrap();
        assert_eq!(parsed.href, "http://x.test/a b");
        assert_eq!(parsed.title, Some("Title here"));
        assert_eq!(parsed.lines, 3);
    }

    #[test]
    fn rejects_non_definitions() {
        assert!(parse_definition(&["    [code]: http://x"]).is_none());
        assert!(parse_definition(&["[a]: http://x trailing junk"]).is_none());
        assert!(parse_definition(&["[]: http://x"]).is_none());
        assert!(parse_definition(&["[a]:", ""]).is_none());
        assert!(parse_definition(&["see [a]: b"]).is_none());
    }
}
