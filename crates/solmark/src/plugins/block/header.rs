use super::{Claim, Cursor, rewrite_blocks};
use solmark_core::text::is_blank;
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin, split_header_id};
use std::borrow::Cow;

/// ATX (`# Title #`) and Setext (`Title` over `===`/`---`) headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Header {
    /// Accept a trailing `{#id}`.
    pub explicit_ids: bool,
}

impl Header {
    fn claim(
        &self,
        cursor: &Cursor<'_>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Claim>, MarkupError> {
        let line = cursor.line();

        if let Some((level, content)) = atx(line) {
            let markup = self.render(level, content, ctx)?;
            return Ok(Some(Claim { lines: 1, markup }));
        }

        if let Some(level) = cursor.next_line().and_then(setext_level)
            && !ctx.is_token(line)
        {
            let markup = self.render(level, line.trim(), ctx)?;
            return Ok(Some(Claim { lines: 2, markup }));
        }

        Ok(None)
    }

    fn render(
        &self,
        level: u8,
        content: &str,
        ctx: &mut Context<'_>,
    ) -> Result<String, MarkupError> {
        let (content, explicit) = if self.explicit_ids {
            split_header_id(content)
        } else {
            (content, None)
        };

        let id = match explicit {
            Some(id) => {
                ctx.slugger_mut().reserve(id);
                Some(id.to_string())
            }
            None if ctx.options().auto_header_ids => Some(ctx.slugger_mut().next_slug(content)),
            None => None,
        };

        let inline = ctx.run_spans(content)?;
        Ok(ctx.markup().heading(level, id.as_deref(), &inline))
    }
}

impl Plugin for Header {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "header",
            phases: &[Phase::Block],
            special_chars: "#=-",
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

/// `#` to `######` at column 0, optional closing hashes.
fn atx(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 {
        return None;
    }
    let level = hashes.min(6);
    let content = line[level..].trim();
    let content = content.trim_end_matches('#').trim_end();
    if content.is_empty() {
        return None;
    }
    Some((level as u8, content))
}

fn setext_level(line: &str) -> Option<u8> {
    let trimmed = line.trim_end();
    if is_blank(trimmed) {
        return None;
    }
    if trimmed.bytes().all(|b| b == b'=') {
        Some(1)
    } else if trimmed.bytes().all(|b| b == b'-') {
        Some(2)
    } else {
        None
    }
}
