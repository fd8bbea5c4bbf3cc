use super::{Claim, Cursor, next_content, rewrite_blocks};
use solmark_core::text::{indent_of, is_blank, join_lines};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// `>` quoted sections, rendered recursively through the block phase.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockQuote;

impl BlockQuote {
    fn claim(
        &self,
        cursor: &Cursor<'_>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Claim>, MarkupError> {
        let width = ctx.tab_width();
        let quoted = |line: &str| indent_of(line) < width && line.trim_start().starts_with('>');
        if !quoted(cursor.line()) {
            return Ok(None);
        }

        let lines = cursor.lines;
        let mut end = cursor.index + 1;
        while end < lines.len() {
            if is_blank(lines[end]) {
                match next_content(lines, end) {
                    Some(next) if quoted(lines[next]) => end = next,
                    _ => break,
                }
            } else if ctx.is_token(lines[end]) {
                break;
            } else {
                // quoted or lazy continuation
                end += 1;
            }
        }

        let body: Vec<&str> = lines[cursor.index..end].iter().map(|l| strip_marker(l)).collect();
        let inner = ctx.run_blocks(&format!("{}\n\n", join_lines(&body)))?;
        let markup = ctx.markup().blockquote(inner.trim());
        Ok(Some(Claim {
            lines: end - cursor.index,
            markup,
        }))
    }
}

impl Plugin for BlockQuote {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "block-quote",
            phases: &[Phase::Block],
            special_chars: ">",
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

/// Drops one `>` and the space after it; lazy lines pass through.
fn strip_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('>') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::strip_marker;

    #[test]
    fn strips_one_level() {
        assert_eq!(strip_marker("> a"), "a");
        assert_eq!(strip_marker(">> a"), "> a");
        assert_eq!(strip_marker("  >a"), "a");
        assert_eq!(strip_marker("lazy"), "lazy");
    }
}
