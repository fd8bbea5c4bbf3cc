use std::collections::HashMap;

/// Splits a trailing `{#custom-id}` off header text.
///
/// The id may contain ASCII alphanumerics, `-`, `_`, `:` and `.`. Returns the
/// text without the suffix and the id, or the original text and `None`.
///
/// ```
/// use solmark_core::slug::split_header_id;
///
/// assert_eq!(split_header_id("Intro {#intro}"), ("Intro", Some("intro")));
/// assert_eq!(split_header_id("Intro"), ("Intro", None));
/// ```
pub fn split_header_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some(body) = trimmed.strip_suffix('}') else {
        return (text, None);
    };
    let Some(open) = body.rfind("{#") else {
        return (text, None);
    };
    let id = &body[open + 2..];
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':' | b'.'));
    if !valid {
        return (text, None);
    }
    (body[..open].trim_end(), Some(id))
}

/// Generates unique header ids within one document.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique id for the given header text.
    pub fn next_slug(&mut self, text: &str) -> String {
        let mut slug = slugify(text);
        let entry = self.counts.entry(slug.clone()).or_insert(0);
        if *entry > 0 {
            slug.push_str(&format!("-{}", *entry));
        }
        *entry += 1;
        slug
    }

    /// Marks an explicit id as used so generated ids avoid it.
    pub fn reserve(&mut self, id: &str) {
        *self.counts.entry(id.to_string()).or_insert(0) += 1;
    }
}

/// Lowercases, keeps letters, digits, `-` and `_`, turns whitespace runs into `-`.
///
/// Ids must start with a letter or `_` to be valid XML names, so a leading
/// digit gets a `section-` prefix. Empty results fall back to `section`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(ch.to_lowercase());
        } else if ch.is_whitespace() {
            pending_dash = true;
        }
    }

    match slug.chars().next() {
        None => "section".to_string(),
        Some(first) if first.is_ascii_digit() => format!("section-{slug}"),
        Some(_) => slug,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Spaced   out  "), "spaced-out");
    }

    #[test]
    fn punctuation_dropped() {
        assert_eq!(slugify("Solar_Markdown::convert()"), "solar_markdownconvert");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn unicode_preserved() {
        assert_eq!(slugify("Héllo Wörld"), "héllo-wörld");
        assert_eq!(slugify("多言語 ガイド"), "多言語-ガイド");
    }

    #[test]
    fn leading_digit_and_empty() {
        assert_eq!(slugify("2024 Changes"), "section-2024-changes");
        assert_eq!(slugify("!!!"), "section");
    }

    #[test]
    fn deduplication() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.next_slug("Title"), "title");
        assert_eq!(slugger.next_slug("Title"), "title-1");
        assert_eq!(slugger.next_slug("Title"), "title-2");
    }

    #[test]
    fn reserve_prevents_collision() {
        let mut slugger = Slugger::new();
        slugger.reserve("intro");
        assert_eq!(slugger.next_slug("Intro"), "intro-1");
    }

    #[test]
    fn header_id_suffix() {
        assert_eq!(
            split_header_id("My Heading {#my-heading}  "),
            ("My Heading", Some("my-heading"))
        );
        assert_eq!(
            split_header_id("Api {#api.convert_v2}"),
            ("Api", Some("api.convert_v2"))
        );
        assert_eq!(split_header_id("Title {#bad id}"), ("Title {#bad id}", None));
        assert_eq!(split_header_id("Title {#}"), ("Title {#}", None));
        assert_eq!(split_header_id("Plain"), ("Plain", None));
    }
}
