use super::{Claim, rewrite_blocks};
use solmark_core::text::indent_of;
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Thematic breaks: three or more `*`, `-` or `_`, optionally spaced.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizRule;

impl Plugin for HorizRule {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "horiz-rule",
            phases: &[Phase::Block],
            special_chars: "*-_",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        rewrite_blocks(text, ctx, |cursor, ctx| {
            Ok(is_rule(cursor.line()).then(|| Claim {
                lines: 1,
                markup: ctx.markup().rule(),
            }))
        })
    }
}

pub(crate) fn is_rule(line: &str) -> bool {
    if indent_of(line) > 3 {
        return false;
    }
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '*' | '-' | '_') {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}
