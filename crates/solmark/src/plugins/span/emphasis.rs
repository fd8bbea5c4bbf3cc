use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// `**strong**`/`__strong__` then `*em*`/`_em_`.
///
/// With `strict` set an underscore only counts at a word boundary, so
/// `snake_case_name` stays as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emphasis {
    /// Reject intraword underscores.
    pub strict: bool,
}

/// Valid closing runs of one marker, consumed front to back.
struct Closers {
    at: Vec<usize>,
    next: usize,
}

impl Closers {
    /// First closer at or after `from`; queries must not go backwards.
    fn first_from(&mut self, from: usize) -> Option<usize> {
        while self.at.get(self.next).is_some_and(|&j| j < from) {
            self.next += 1;
        }
        self.at.get(self.next).copied()
    }
}

impl Emphasis {
    /// Strong pass, then emphasis pass over what is left.
    fn emphasize(
        &self,
        text: &str,
        ctx: &mut Context<'_>,
    ) -> Result<Option<String>, MarkupError> {
        let strong = self.pass(text, 2, ctx)?;
        let source = strong.as_deref().unwrap_or(text);
        Ok(self.pass(source, 1, ctx)?.or(strong))
    }

    /// Pairs each opening run of `width` markers with the first closer after it.
    ///
    /// The content is emphasized on its own and the whole construct becomes
    /// one placeholder.
    fn pass(
        &self,
        text: &str,
        width: usize,
        ctx: &mut Context<'_>,
    ) -> Result<Option<String>, MarkupError> {
        let bytes = text.as_bytes();
        let mut stars = self.closers(text, width, b'*');
        let mut underscores = self.closers(text, width, b'_');
        let mut out = String::new();
        let mut copied = 0;
        let mut i = 0;

        while i + width <= bytes.len() {
            let marker = bytes[i];
            let closers = match marker {
                b'*' => &mut stars,
                b'_' => &mut underscores,
                _ => {
                    i += 1;
                    continue;
                }
            };
            if !run_of(bytes, i, marker, width) || !self.can_open(text, i, width, marker) {
                i += 1;
                continue;
            }
            let Some(close) = closers.first_from(i + width + 1) else {
                i += 1;
                continue;
            };

            let inner = &text[i + width..close];
            let inner = ctx
                .nest(|ctx| self.emphasize(inner, ctx))?
                .unwrap_or_else(|| inner.to_string());
            let (open_tag, close_tag) = ctx.markup().emphasis(width == 2);
            let token = ctx.reserve(format!("{open_tag}{inner}{close_tag}"));

            out.push_str(&text[copied..i]);
            out.push_str(&token);
            i = close + width;
            copied = i;
        }

        if copied == 0 {
            return Ok(None);
        }
        out.push_str(&text[copied..]);
        Ok(Some(out))
    }

    fn can_open(&self, text: &str, at: usize, width: usize, marker: u8) -> bool {
        let next = text[at + width..].chars().next();
        if next.is_none_or(char::is_whitespace) {
            return false;
        }
        if self.strict && marker == b'_' {
            return text[..at].chars().next_back().is_none_or(|c| !c.is_alphanumeric());
        }
        true
    }

    /// Every position where a run of `width` markers may close.
    fn closers(&self, text: &str, width: usize, marker: u8) -> Closers {
        let end = text.len().saturating_sub(width);
        let at = (1..=end)
            .filter(|&j| self.closes_at(text, j, width, marker))
            .collect();
        Closers { at, next: 0 }
    }

    /// The closer is taken from the end of a longer run so that `***x***`
    /// leaves `*x*` for the inner pass.
    fn closes_at(&self, text: &str, j: usize, width: usize, marker: u8) -> bool {
        let bytes = text.as_bytes();
        if !run_of(bytes, j, marker, width)
            || bytes.get(j + width) == Some(&marker)
            || text[..j].ends_with(char::is_whitespace)
            || (width == 1 && bytes[j - 1] == marker)
        {
            return false;
        }
        !self.strict
            || marker != b'_'
            || text[j + width..]
                .chars()
                .next()
                .is_none_or(|c| !c.is_alphanumeric())
    }
}

fn run_of(bytes: &[u8], at: usize, marker: u8, width: usize) -> bool {
    bytes.get(at..at + width).is_some_and(|s| s.iter().all(|b| *b == marker))
}

impl Plugin for Emphasis {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "emphasis",
            phases: &[Phase::Span],
            special_chars: "*_",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        if !text.contains(['*', '_']) {
            return Ok(Cow::Borrowed(text));
        }
        Ok(match self.emphasize(text, ctx)? {
            Some(changed) => Cow::Owned(changed),
            None => Cow::Borrowed(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Emphasis;
    use crate::plugins::testing::run_html;
    use solmark_core::Phase;

    fn em(text: &str, strict: bool) -> String {
        run_html(Emphasis { strict }, Phase::Span, text)
    }

    #[test]
    fn strong_and_em() {
        assert_eq!(em("**a** and *b*", false), "<strong>a</strong> and <em>b</em>");
        assert_eq!(em("__a__ _b_", false), "<strong>a</strong> <em>b</em>");
    }

    #[test]
    fn triple_markers_nest() {
        assert_eq!(em("***x***", false), "<strong><em>x</em></strong>");
    }

    #[test]
    fn spaced_markers_are_literal() {
        assert_eq!(em("2 * 3 * 4", false), "2 * 3 * 4");
        assert_eq!(em("* not em*", false), "* not em*");
    }

    #[test]
    fn strict_underscores_need_word_boundaries() {
        assert_eq!(em("snake_case_name", true), "snake_case_name");
        assert_eq!(em("snake_case_name", false), "snake<em>case</em>name");
        assert_eq!(em("an _em_ word", true), "an <em>em</em> word");
    }

    #[test]
    fn strong_and_em_never_cross() {
        assert_eq!(em("*a **b* c**", false), "*a <strong>b* c</strong>");
        assert_eq!(em("**a *b** c*", false), "<strong>a *b</strong> c*");
    }

    #[test]
    fn inner_markers_stay_inside() {
        assert_eq!(em("*a *b* c*", false), "<em>a *b</em> c*");
        assert_eq!(em("*a **b** c*", false), "<em>a <strong>b</strong> c</em>");
    }

    #[test]
    fn unmatched_openers_scale_linearly() {
        let text = "*a ".repeat(20_000);
        assert_eq!(em(&text, false), text);
    }
}
