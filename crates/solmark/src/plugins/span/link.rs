//! Inline and reference links and images.

use super::{Pairs, Splice};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin, Warning, normalize_label};
use std::borrow::Cow;

/// `![alt](src "title")` and `![alt][id]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Image;

/// `[text](href "title")`, `[text][id]` and `[text][]`.
///
/// The link text runs through the span phase on its own, one inline level
/// deeper, and the finished link becomes one placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Link;

/// Where a bracketed label points.
#[derive(Debug, PartialEq, Eq)]
enum Target<'a> {
    Inline { href: &'a str, title: Option<&'a str> },
    Reference { id: &'a str },
}

/// Bracket and parenthesis pairs of one span, indexed once per apply.
struct Scanner<'a> {
    text: &'a str,
    brackets: Pairs,
    parens: Pairs,
}

/// A `[label]` followed by a target, spanning `start..end`.
#[derive(Debug, PartialEq, Eq)]
struct Parsed<'a> {
    label: &'a str,
    target: Target<'a>,
    end: usize,
}

impl Plugin for Image {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "image",
            phases: &[Phase::Span],
            special_chars: "!",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        if !text.contains("![") {
            return Ok(Cow::Borrowed(text));
        }
        let scanner = Scanner::new(text);
        let mut splice = Splice::new(text);
        let mut from = 0;
        while let Some(offset) = text[from..].find("![") {
            let start = from + offset;
            let Some(parsed) = scanner.parse(start + 1) else {
                from = start + 2;
                continue;
            };
            from = parsed.end;
            let Some((src, title)) = resolve(&parsed, ctx)? else {
                continue;
            };
            let alt = ctx.tokens().resolve(parsed.label)?;
            let markup = ctx.markup().image(&src, &alt, title.as_deref());
            let token = ctx.reserve(markup);
            splice.replace(start, parsed.end, &token);
        }
        Ok(splice.finish())
    }
}

impl Plugin for Link {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "link",
            phases: &[Phase::Span],
            special_chars: "[]()",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        if !text.contains('[') {
            return Ok(Cow::Borrowed(text));
        }
        let scanner = Scanner::new(text);
        let mut splice = Splice::new(text);
        let mut from = 0;
        while let Some(offset) = text[from..].find('[') {
            let start = from + offset;
            // unresolved image references are left for the reader
            if text[..start].ends_with('!') {
                from = start + 1;
                continue;
            }
            let Some(parsed) = scanner.parse(start) else {
                from = start + 1;
                continue;
            };
            from = parsed.end;
            let Some((href, title)) = resolve(&parsed, ctx)? else {
                continue;
            };
            let label = ctx.nest(|ctx| ctx.run_spans(parsed.label))?;
            let (open, close) = ctx.markup().link(&href, title.as_deref());
            let token = ctx.reserve(format!("{open}{label}{close}"));
            splice.replace(start, parsed.end, &token);
        }
        Ok(splice.finish())
    }
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            brackets: Pairs::new(text, b'[', b']'),
            parens: Pairs::new(text, b'(', b')'),
        }
    }

    /// Parses `[label]` at `open` and the target after it.
    fn parse(&self, open: usize) -> Option<Parsed<'a>> {
        let text = self.text;
        let close = self.brackets.close(open)?;
        let label = &text[open + 1..close];
        let rest = &text[close + 1..];

        if rest.starts_with('(') {
            let end = self.parens.close(close + 1)?;
            let (href, title) = inline_target(&text[close + 2..end])?;
            return Some(Parsed {
                label,
                target: Target::Inline { href, title },
                end: end + 1,
            });
        }

        let gap = usize::from(rest.starts_with(' ') || rest.starts_with('\n'));
        if rest[gap..].starts_with('[') {
            let id_open = close + 1 + gap;
            let id_close = self.brackets.close(id_open)?;
            let id = &text[id_open + 1..id_close];
            return Some(Parsed {
                label,
                target: Target::Reference {
                    id: if id.trim().is_empty() { label } else { id },
                },
                end: id_close + 1,
            });
        }
        None
    }
}

/// Splits `href "title"` (the href may be wrapped in `<>`).
fn inline_target(inner: &str) -> Option<(&str, Option<&str>)> {
    let inner = inner.trim();
    let (href, rest) = match inner.strip_prefix('<') {
        Some(body) => {
            let end = body.find('>')?;
            (&body[..end], body[end + 1..].trim())
        }
        None => {
            let end = inner.find(char::is_whitespace).unwrap_or(inner.len());
            (&inner[..end], inner[end..].trim())
        }
    };
    if rest.is_empty() {
        return Some((href, None));
    }
    let quote = rest.chars().next()?;
    if !matches!(quote, '"' | '\'') || rest.len() < 2 || !rest.ends_with(quote) {
        return None;
    }
    Some((href, Some(&rest[1..rest.len() - 1])))
}

/// Final href and title, or `None` (with a warning) for an unknown reference.
fn resolve(
    parsed: &Parsed<'_>,
    ctx: &mut Context<'_>,
) -> Result<Option<(String, Option<String>)>, MarkupError> {
    let (href, title) = match parsed.target {
        Target::Inline { href, title } => (href.to_string(), title.map(str::to_string)),
        Target::Reference { id } => {
            let key = ctx.tokens().resolve(id)?;
            match ctx.links().get(&key) {
                Some(definition) => (definition.href.clone(), definition.title.clone()),
                None => {
                    ctx.warn(Warning::UnresolvedReference {
                        name: normalize_label(&key),
                    });
                    return Ok(None);
                }
            }
        }
    };
    let href = ctx.tokens().resolve(&href)?;
    let title = title.map(|t| ctx.tokens().resolve(&t)).transpose()?;
    Ok(Some((href, title)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_targets() {
        assert_eq!(inline_target(" /a "), Some(("/a", None)));
        assert_eq!(
            inline_target("<a b.html> 'Title'"),
            Some(("a b.html", Some("Title")))
        );
        assert_eq!(inline_target("/a \"T\""), Some(("/a", Some("T"))));
        assert_eq!(inline_target("/a junk"), None);
    }

    #[test]
    fn reference_forms() {
        let parsed = Scanner::new("[x][1] tail").parse(0).unwrap();
        assert_eq!(parsed.label, "x");
        assert_eq!(parsed.target, Target::Reference { id: "1" });
        assert_eq!(parsed.end, 6);

        let shorthand = Scanner::new("[Docs] []").parse(0).unwrap();
        assert_eq!(shorthand.target, Target::Reference { id: "Docs" });
    }

    #[test]
    fn nested_parens_in_href() {
        let parsed = Scanner::new("[w](http://x.org/a_(b)) end").parse(0).unwrap();
        assert_eq!(
            parsed.target,
            Target::Inline {
                href: "http://x.org/a_(b)",
                title: None
            }
        );
        assert_eq!(parsed.end, 23);
    }

    #[test]
    fn plain_brackets_are_not_links() {
        assert_eq!(Scanner::new("[just text] here").parse(0), None);
        assert_eq!(Scanner::new("[open").parse(0), None);
    }

    #[test]
    fn link_text_is_rendered_inside_the_link() {
        use crate::plugins::span::Emphasis;
        use crate::markup::HtmlMarkup;
        use solmark_core::{ConvertOptions, Pipeline};

        let mut pipeline = Pipeline::new();
        pipeline.register(Link).unwrap();
        pipeline.register(Emphasis::default()).unwrap();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &HtmlMarkup, &options);

        let out = ctx.run_spans("[a *b*](/x) *c*").unwrap();
        assert_eq!(
            ctx.tokens().resolve(&out).unwrap(),
            "<a href=\"/x\">a <em>b</em></a> <em>c</em>"
        );
    }
}
