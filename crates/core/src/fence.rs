//! Code fence tracking.
//!
//! Prepare plugins use this to leave fenced code alone; the fenced code
//! plugin uses it to find block boundaries.

use crate::text::indent_of;

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase, marker and opener length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Fence marker character (``` or ~~~).
    pub marker: Option<char>,
    /// Length of the opening fence.
    pub length: usize,
}

/// What a single line did to the fence state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceEvent {
    /// Line is outside any fence.
    Text,
    /// Line opened a fence.
    Open,
    /// Line is fence content.
    Content,
    /// Line closed the fence.
    Close,
}

/// Advance fence state by one line.
///
/// Openers and closers must be indented less than `indent_limit` spaces;
/// deeper lines are indented code, not fences.
pub fn advance_fence_state(
    line: &str,
    state: FenceState,
    indent_limit: usize,
) -> (FenceState, FenceEvent) {
    let indent = indent_of(line);
    let after_indent = &line[indent..];

    match state.phase {
        FencePhase::Outside => {
            if indent < indent_limit
                && let Some((marker, length)) = fence_marker(after_indent)
                && (marker == '~' || !after_indent[length..].contains('`'))
            {
                let next = FenceState {
                    phase: FencePhase::InsideFence,
                    marker: Some(marker),
                    length,
                };
                return (next, FenceEvent::Open);
            }
            (state, FenceEvent::Text)
        }
        FencePhase::InsideFence => {
            if indent < indent_limit
                && is_closing_fence(after_indent)
                && let Some((marker, length)) = fence_marker(after_indent)
                && Some(marker) == state.marker
                && length >= state.length
            {
                return (FenceState::default(), FenceEvent::Close);
            }
            (state, FenceEvent::Content)
        }
    }
}

/// First word of the opener's info string, if any.
pub fn fence_info(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let (_, length) = fence_marker(trimmed)?;
    trimmed[length..].split_whitespace().next()
}

/// Marks the lines that belong to closed fences (opener and closer included).
///
/// A fence that never closes is not marked.
pub fn fence_mask(lines: &[&str], indent_limit: usize) -> Vec<bool> {
    let mut mask = vec![false; lines.len()];
    let mut state = FenceState::default();
    let mut opened_at = None;
    for (i, line) in lines.iter().enumerate() {
        let (next, event) = advance_fence_state(line, state, indent_limit);
        state = next;
        match event {
            FenceEvent::Open => opened_at = Some(i),
            FenceEvent::Close => {
                if let Some(start) = opened_at.take() {
                    mask[start..=i].iter_mut().for_each(|m| *m = true);
                }
            }
            FenceEvent::Text | FenceEvent::Content => {}
        }
    }
    mask
}

fn fence_marker(after_indent: &str) -> Option<(char, usize)> {
    let first = after_indent.chars().next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run_len = after_indent.chars().take_while(|c| *c == first).count();
    (run_len >= 3).then_some((first, run_len))
}

/// A closing fence has only markers followed by optional whitespace.
fn is_closing_fence(after_indent: &str) -> bool {
    match fence_marker(after_indent) {
        Some((_, length)) => after_indent[length..].trim().is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> Vec<FenceEvent> {
        let mut state = FenceState::default();
        lines
            .iter()
            .map(|line| {
                let (next, event) = advance_fence_state(line, state, 4);
                state = next;
                event
            })
            .collect()
    }

    #[test]
    fn opens_and_closes_backtick_fence() {
        let events = run(&["```js", "let a = 1;", "```", "after"]);
        assert_eq!(
            events,
            vec![
                FenceEvent::Open,
                FenceEvent::Content,
                FenceEvent::Close,
                FenceEvent::Text
            ]
        );
    }

    #[test]
    fn deeply_indented_fence_not_opened() {
        assert_eq!(run(&["    ```js"]), vec![FenceEvent::Text]);
    }

    #[test]
    fn mismatched_marker_does_not_close() {
        let events = run(&["~~~", "```", "~~~"]);
        assert_eq!(
            events,
            vec![FenceEvent::Open, FenceEvent::Content, FenceEvent::Close]
        );
    }

    #[test]
    fn shorter_closer_does_not_close() {
        let events = run(&["````", "```", "````"]);
        assert_eq!(events[1], FenceEvent::Content);
        assert_eq!(events[2], FenceEvent::Close);
    }

    #[test]
    fn info_string_line_is_not_a_closer() {
        let events = run(&["```", "```js", "```"]);
        assert_eq!(events[1], FenceEvent::Content);
        assert_eq!(events[2], FenceEvent::Close);
    }

    #[test]
    fn backtick_info_with_backticks_is_not_a_fence() {
        assert_eq!(run(&["``` a ` b"]), vec![FenceEvent::Text]);
    }

    #[test]
    fn info_word() {
        assert_eq!(fence_info("```rust ignore"), Some("rust"));
        assert_eq!(fence_info("  ~~~"), None);
        assert_eq!(fence_info("plain"), None);
    }

    #[test]
    fn mask_skips_unclosed_fences() {
        let lines = ["a", "```", "b", "```", "c", "~~~", "d"];
        assert_eq!(
            fence_mask(&lines, 4),
            vec![false, true, true, true, false, false, false]
        );
    }
}
