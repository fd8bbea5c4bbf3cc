use super::list::compact;
use super::{Claim, Cursor, next_content, rewrite_blocks};
use solmark_core::text::{indent_of, is_blank, join_lines, outdent};
use solmark_core::{Context, Definition, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Definition lists: term lines followed by `:`-prefixed definitions.
///
/// ```text
/// Term
/// :   Definition
///     continued
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefList;

/// Term lines `[start, terms_end)` and the first definition line.
#[derive(Debug, Clone, Copy)]
struct TermGroup {
    start: usize,
    terms_end: usize,
    definition: usize,
    blank_before: bool,
}

#[derive(Debug)]
struct Body<'a> {
    lines: Vec<&'a str>,
    loose: bool,
}

impl DefList {
    fn claim(
        &self,
        cursor: &Cursor<'_>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Claim>, MarkupError> {
        let width = ctx.tab_width();
        let lines = cursor.lines;
        if !cursor.fresh {
            return Ok(None);
        }
        let Some(mut group) = term_group(lines, cursor.index, width, ctx) else {
            return Ok(None);
        };

        let mut entries: Vec<(&[&str], Vec<Body<'_>>)> = Vec::new();
        let end = loop {
            let mut bodies = Vec::new();
            let mut at = group.definition;
            let mut blank_before = group.blank_before;

            while let Some(content) = definition_start(lines[at], width) {
                let mut body = Body {
                    lines: vec![&lines[at][content..]],
                    loose: blank_before,
                };
                at += 1;
                while at < lines.len() {
                    let line = lines[at];
                    if is_blank(line) {
                        match next_content(lines, at) {
                            Some(next)
                                if indent_of(lines[next]) >= width && !ctx.is_token(lines[next]) =>
                            {
                                body.lines.extend(std::iter::repeat_n("", next - at));
                                body.loose = true;
                                at = next;
                            }
                            _ => break,
                        }
                    } else if ctx.is_token(line) || definition_start(line, width).is_some() {
                        break;
                    } else {
                        body.lines.push(outdent(line, width));
                        at += 1;
                    }
                }
                bodies.push(body);

                match next_content(lines, at) {
                    Some(next) if definition_start(lines[next], width).is_some() => {
                        blank_before = next != at;
                        at = next;
                    }
                    _ => break,
                }
            }
            entries.push((&lines[group.start..group.terms_end], bodies));

            // another term group must follow a blank line
            match next_content(lines, at) {
                Some(start) if start > at => match term_group(lines, start, width, ctx) {
                    Some(next_group) => group = next_group,
                    None => break at,
                },
                _ => break at,
            }
        };

        let mut rendered = Vec::with_capacity(entries.len());
        for (terms, bodies) in &entries {
            let mut definition = Definition::default();
            for term in terms.iter() {
                definition.terms.push(ctx.run_spans(term.trim())?);
            }
            for body in bodies {
                let text = format!("{}\n\n", join_lines(&body.lines));
                let content = ctx.run_item_blocks(&text, !body.loose)?;
                definition.definitions.push(compact(&content));
            }
            rendered.push(definition);
        }

        let markup = ctx.markup().definition_list(&rendered);
        Ok(Some(Claim {
            lines: end - cursor.index,
            markup,
        }))
    }
}

impl Plugin for DefList {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "def-list",
            phases: &[Phase::Block],
            special_chars: ":",
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

/// Term lines starting at `start`, then an optional blank, then a definition.
fn term_group(lines: &[&str], start: usize, width: usize, ctx: &Context<'_>) -> Option<TermGroup> {
    let is_term = |line: &str| {
        !is_blank(line) && !ctx.is_token(line) && definition_start(line, width).is_none()
    };
    let terms_end = (start..lines.len())
        .find(|&i| !is_term(lines[i]))
        .unwrap_or(lines.len());
    if terms_end == start {
        return None;
    }
    let definition = next_content(lines, terms_end)?;
    definition_start(lines[definition], width)?;
    Some(TermGroup {
        start,
        terms_end,
        definition,
        blank_before: definition > terms_end,
    })
}

/// Byte offset of the definition text after `:` and its spaces.
fn definition_start(line: &str, width: usize) -> Option<usize> {
    let indent = indent_of(line);
    if indent >= width {
        return None;
    }
    let after = line[indent..].strip_prefix(':')?;
    let spaces = indent_of(after);
    if spaces == 0 || after.trim().is_empty() {
        return None;
    }
    Some(indent + 1 + spaces)
}
