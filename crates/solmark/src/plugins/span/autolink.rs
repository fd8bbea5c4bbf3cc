use super::Splice;
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

const SCHEMES: &[&str] = &["http://", "https://", "ftp://", "mailto:"];

/// `<http://example.com>` and `<user@example.com>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autolink;

impl Plugin for Autolink {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "autolink",
            phases: &[Phase::Span],
            special_chars: "<>",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let mut splice = Splice::new(text);
        let mut from = 0;
        while let Some(offset) = text[from..].find('<') {
            let start = from + offset;
            let Some(len) = text[start + 1..].find(['>', '<', ' ', '\n']) else {
                break;
            };
            let end = start + 1 + len;
            from = start + 1;
            if text.as_bytes()[end] != b'>' {
                continue;
            }
            let inner = &text[start + 1..end];
            let Some((href, shown)) = target(inner) else {
                continue;
            };
            let markup = ctx.markup();
            let (open, close) = markup.link(&href, None);
            let token = ctx.reserve(format!("{open}{}{close}", markup.escape_text(shown)));
            splice.replace(start, end + 1, &token);
            from = end + 1;
        }
        Ok(splice.finish())
    }
}

/// Href and displayed text for the inside of `<...>`.
fn target(inner: &str) -> Option<(String, &str)> {
    let lower = inner.to_ascii_lowercase();
    if let Some(scheme) = SCHEMES.iter().find(|s| lower.starts_with(*s)) {
        if inner.len() == scheme.len() {
            return None;
        }
        let shown = if *scheme == "mailto:" { &inner[scheme.len()..] } else { inner };
        return Some((inner.to_string(), shown));
    }
    is_email(inner).then(|| (format!("mailto:{inner}"), inner))
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    let allowed = |b: u8| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'+');
    !local.is_empty()
        && local.bytes().all(allowed)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.bytes().all(|b| b != b'+' && allowed(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_and_mail_targets() {
        assert_eq!(
            target("https://example.com/a?b=1"),
            Some(("https://example.com/a?b=1".to_string(), "https://example.com/a?b=1"))
        );
        assert_eq!(
            target("mailto:me@x.org"),
            Some(("mailto:me@x.org".to_string(), "me@x.org"))
        );
        assert_eq!(
            target("me@x.org"),
            Some(("mailto:me@x.org".to_string(), "me@x.org"))
        );
    }

    #[test]
    fn rejects_other_brackets() {
        assert_eq!(target("http://"), None);
        assert_eq!(target("b"), None);
        assert_eq!(target("a@b"), None);
        assert_eq!(target("@x.org"), None);
    }
}
