use super::{Claim, Cursor, next_content, rewrite_blocks};
use solmark_core::text::{indent_of, is_blank, join_lines, outdent};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Indented code blocks: lines indented by at least one tab stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeBlock;

impl CodeBlock {
    fn claim(&self, cursor: &Cursor<'_>, ctx: &mut Context<'_>) -> Option<Claim> {
        let width = ctx.tab_width();
        if !cursor.fresh || indent_of(cursor.line()) < width {
            return None;
        }

        let lines = cursor.lines;
        let mut end = cursor.index + 1;
        while end < lines.len() {
            if is_blank(lines[end]) {
                match next_content(lines, end) {
                    Some(next) if indent_of(lines[next]) >= width => end = next,
                    _ => break,
                }
            } else if indent_of(lines[end]) >= width {
                end += 1;
            } else {
                break;
            }
        }

        let body: Vec<&str> = lines[cursor.index..end]
            .iter()
            .map(|line| outdent(line, width))
            .collect();
        let markup = ctx.markup().code_block(None, &join_lines(&body));
        Some(Claim {
            lines: end - cursor.index,
            markup,
        })
    }
}

impl Plugin for CodeBlock {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "code-block",
            phases: &[Phase::Block],
            special_chars: "",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        rewrite_blocks(text, ctx, |cursor, ctx| Ok(self.claim(cursor, ctx)))
    }
}
