use super::Splice;
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Two or more trailing spaces before a newline force a line break.
#[derive(Debug, Clone, Copy, Default)]
pub struct Break;

impl Plugin for Break {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "break",
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
        let mut from = 0;
        while let Some(offset) = text[from..].find("  \n") {
            let newline = from + offset + 2;
            let start = text[..newline].trim_end_matches(' ').len();
            let token = ctx.reserve(ctx.markup().line_break());
            splice.replace(start, newline, &token);
            from = newline + 1;
        }
        Ok(splice.finish())
    }
}

/// Encodes the `&`, `<` and `>` left in plain text.
///
/// An `&` that already starts an entity is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encode;

impl Plugin for Encode {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "encode",
            phases: &[Phase::Span],
            special_chars: "",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        _ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let mut splice = Splice::new(text);
        for (i, b) in text.bytes().enumerate() {
            match b {
                b'&' if !starts_entity(&text[i + 1..]) => splice.replace(i, i + 1, "&amp;"),
                b'<' => splice.replace(i, i + 1, "&lt;"),
                b'>' => splice.replace(i, i + 1, "&gt;"),
                _ => {}
            }
        }
        Ok(splice.finish())
    }
}

/// `name;`, `#123;` or `#x1F;` after an `&`.
fn starts_entity(rest: &str) -> bool {
    let end = rest
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'#')
        .count();
    if rest.as_bytes().get(end) != Some(&b';') {
        return false;
    }
    let name = &rest[..end];
    match name.strip_prefix('#') {
        Some(num) => match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()),
            None => !num.is_empty() && num.bytes().all(|b| b.is_ascii_digit()),
        },
        None => !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric()),
    }
}

#[cfg(test)]
mod tests {
    use super::starts_entity;

    #[test]
    fn entity_detection() {
        assert!(starts_entity("amp; rest"));
        assert!(starts_entity("#169;"));
        assert!(starts_entity("#x1F;"));
        assert!(!starts_entity(" T;"));
        assert!(!starts_entity("#;"));
        assert!(!starts_entity("copy"));
        assert!(!starts_entity("a b;"));
    }
}
