use super::{Splice, is_escaped};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;
use std::collections::HashMap;

/// Backtick code spans; the closing run must match the opening run's length.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeSpan;

impl Plugin for CodeSpan {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "code-span",
            phases: &[Phase::Span],
            special_chars: "`",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let runs = backtick_runs(text.as_bytes());
        if runs.len() < 2 {
            return Ok(Cow::Borrowed(text));
        }
        let mut closers = Closers::new(&runs);
        let mut splice = Splice::new(text);
        let mut consumed = 0;
        for &(start, len) in &runs {
            if start < consumed || is_escaped(text, start) {
                continue;
            }
            let Some(close) = closers.after(start, len) else {
                continue;
            };
            let code = text[start + len..close].trim_matches([' ', '\t', '\n']);
            let markup = ctx.markup().code_span(code);
            let token = ctx.reserve(markup);
            splice.replace(start, close + len, &token);
            consumed = close + len;
        }
        Ok(splice.finish())
    }
}

/// Every backtick run as `(start, len)`, in order.
fn backtick_runs(bytes: &[u8]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let len = bytes[i..].iter().take_while(|b| **b == b'`').count();
            runs.push((i, len));
            i += len;
        } else {
            i += 1;
        }
    }
    runs
}

/// Run starts grouped by length, each with a cursor that only moves forward.
struct Closers {
    starts: HashMap<usize, (Vec<usize>, usize)>,
}

impl Closers {
    fn new(runs: &[(usize, usize)]) -> Self {
        let mut starts: HashMap<usize, (Vec<usize>, usize)> = HashMap::new();
        for &(start, len) in runs {
            starts.entry(len).or_default().0.push(start);
        }
        Self { starts }
    }

    /// Start of the next run of exactly `len` backticks after `from`.
    fn after(&mut self, from: usize, len: usize) -> Option<usize> {
        let (starts, next) = self.starts.get_mut(&len)?;
        while starts.get(*next).is_some_and(|&s| s <= from) {
            *next += 1;
        }
        starts.get(*next).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::testing::run_html;

    #[test]
    fn runs_are_indexed() {
        assert_eq!(backtick_runs(b"a `` b ` c``"), vec![(2, 2), (7, 1), (10, 2)]);
    }

    #[test]
    fn closing_run_must_match_length() {
        assert_eq!(
            run_html(CodeSpan, Phase::Span, "a `` b ` c`` d"),
            "a <code>b ` c</code> d"
        );
        assert_eq!(run_html(CodeSpan, Phase::Span, "a ``` b"), "a ``` b");
    }

    #[test]
    fn unmatched_runs_scale_linearly() {
        let text: String = (1..200).map(|n| "`".repeat(n) + " x ").collect();
        assert_eq!(run_html(CodeSpan, Phase::Span, &text), text);
    }
}
