use super::Splice;
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Inline tags and comments pass through verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineHtml;

impl Plugin for InlineHtml {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "inline-html",
            phases: &[Phase::Span],
            special_chars: "",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let mut splice = Splice::new(text);
        let last_comment_end = text.rfind("-->");
        let mut from = 0;
        while let Some(offset) = text[from..].find('<') {
            let start = from + offset;
            if text[start..].starts_with("<!--")
                && last_comment_end.is_none_or(|end| end < start + 4)
            {
                from = start + 1;
                continue;
            }
            match tag_end(&text[start..]) {
                Some(len) => {
                    let token = ctx.reserve(&text[start..start + len]);
                    splice.replace(start, start + len, &token);
                    from = start + len;
                }
                None => from = start + 1,
            }
        }
        Ok(splice.finish())
    }
}

/// Byte length of the tag or comment starting `text`, if it is one.
///
/// Autolinks (`<http://…>`, `<a@b.c>`) are not tags: a tag name must be
/// followed by whitespace, `/` or `>`. A `<` ends the scan even inside a
/// quoted attribute value.
pub(crate) fn tag_end(text: &str) -> Option<usize> {
    if let Some(body) = text.strip_prefix("<!--") {
        return body.find("-->").map(|end| 4 + end + 3);
    }
    let bytes = text.as_bytes();
    let mut i = 1;
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    while bytes.get(i).is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-') {
        i += 1;
    }
    match bytes.get(i)? {
        b'>' => return Some(i + 1),
        b'/' | b' ' | b'\t' | b'\n' => {}
        _ => return None,
    }

    let mut quote = None;
    for (offset, b) in bytes[i..].iter().enumerate() {
        match (quote, *b) {
            (_, b'<') => return None,
            (Some(q), b) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(*b),
            (None, b'>') => return Some(i + offset + 1),
            (None, _) => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{InlineHtml, tag_end};
    use crate::plugins::testing::run_html;
    use solmark_core::Phase;

    #[test]
    fn recognizes_tags() {
        assert_eq!(tag_end("<b>x"), Some(3));
        assert_eq!(tag_end("</span> x"), Some(7));
        assert_eq!(tag_end("<a href=\"x>y\">z"), Some(14));
        assert_eq!(tag_end("<br/>"), Some(5));
        assert_eq!(tag_end("<!-- c --> x"), Some(10));
    }

    #[test]
    fn rejects_autolinks_and_comparisons() {
        assert_eq!(tag_end("<http://x.org>"), None);
        assert_eq!(tag_end("<me@x.org>"), None);
        assert_eq!(tag_end("< b"), None);
        assert_eq!(tag_end("<b"), None);
        assert_eq!(tag_end("<a <b>"), None);
        assert_eq!(tag_end("<a title='<b>'>"), None);
    }

    #[test]
    fn unclosed_tags_and_comments_scale_linearly() {
        for unit in ["<!--", "<a '", "<a \""] {
            let text = unit.repeat(20_000);
            assert_eq!(run_html(InlineHtml, Phase::Span, &text), text);
        }
        assert_eq!(
            run_html(InlineHtml, Phase::Span, "<!-- a <!-- b --> c"),
            "<!-- a <!-- b --> c"
        );
    }
}
