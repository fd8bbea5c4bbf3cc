use super::Splice;
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Backslash escapes for every character some registered plugin treats specially.
#[derive(Debug, Clone, Copy, Default)]
pub struct Escape;

impl Plugin for Escape {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "escape",
            phases: &[Phase::Span],
            special_chars: "\\",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let mut splice = Splice::new(text);
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c != '\\' {
                continue;
            }
            if let Some(&(_, next)) = chars.peek()
                && ctx.is_escapable(next)
            {
                chars.next();
                let markup = ctx.markup().escape_text(next.encode_utf8(&mut [0; 4]));
                let token = ctx.reserve(markup);
                splice.replace(i, i + 1 + next.len_utf8(), &token);
            }
        }
        Ok(splice.finish())
    }
}
