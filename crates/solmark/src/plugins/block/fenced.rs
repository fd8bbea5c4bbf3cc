use super::{Claim, Cursor, rewrite_blocks};
use solmark_core::fence::{FenceEvent, FenceState, advance_fence_state, fence_info};
use solmark_core::text::{indent_of, join_lines, outdent};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin, Warning};
use std::borrow::Cow;

/// ```` ``` ```` and `~~~` fenced code with an optional language.
///
/// A fence that never closes is left as ordinary text and reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct FencedCode;

/// Shortest opener per marker whose scan ran off the end of the text.
///
/// A later opener with the same marker that is at least as long can only
/// close on a line that scan already rejected.
#[derive(Debug, Default)]
struct Unclosed {
    backtick: Option<usize>,
    tilde: Option<usize>,
}

impl Unclosed {
    fn slot(&mut self, marker: Option<char>) -> &mut Option<usize> {
        match marker {
            Some('~') => &mut self.tilde,
            _ => &mut self.backtick,
        }
    }
}

impl FencedCode {
    fn claim(
        &self,
        cursor: &Cursor<'_>,
        unclosed: &mut Unclosed,
        ctx: &mut Context<'_>,
    ) -> Option<Claim> {
        let width = ctx.tab_width();
        let opener = cursor.line();
        let (mut state, event) = advance_fence_state(opener, FenceState::default(), width);
        if event != FenceEvent::Open {
            return None;
        }
        let (marker, length) = (state.marker, state.length);
        if unclosed.slot(marker).is_some_and(|shortest| length >= shortest) {
            return None;
        }

        let lines = cursor.lines;
        let mut close = None;
        for (i, line) in lines.iter().enumerate().skip(cursor.index + 1) {
            let (next, event) = advance_fence_state(line, state, width);
            state = next;
            if event == FenceEvent::Close {
                close = Some(i);
                break;
            }
        }

        let Some(close) = close else {
            let shortest = unclosed.slot(marker);
            *shortest = Some(shortest.map_or(length, |s| s.min(length)));
            ctx.warn(Warning::UnclosedCodeFence {
                marker: marker.unwrap_or('`'),
                context: opener.trim().to_string(),
            });
            return None;
        };

        let indent = indent_of(opener);
        let body: Vec<&str> = lines[cursor.index + 1..close]
            .iter()
            .map(|line| outdent(line, indent))
            .collect();
        let markup = ctx
            .markup()
            .code_block(fence_info(opener), &join_lines(&body));
        Some(Claim {
            lines: close - cursor.index + 1,
            markup,
        })
    }
}

impl Plugin for FencedCode {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "fenced-code",
            phases: &[Phase::Block],
            special_chars: "~",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let mut unclosed = Unclosed::default();
        rewrite_blocks(text, ctx, |cursor, ctx| {
            Ok(self.claim(cursor, &mut unclosed, ctx))
        })
    }
}
