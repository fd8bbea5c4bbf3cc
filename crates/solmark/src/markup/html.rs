use super::{attr, text};
use solmark_core::{Definition, ListKind, Markup, OutputFormat, TableMarkup};
use std::fmt::Write as _;

/// HTML fragments in the classic Markdown.pl shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMarkup;

impl Markup for HtmlMarkup {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn paragraph(&self, content: &str) -> String {
        format!("<p>{content}</p>")
    }

    fn tight_block(&self, content: &str) -> String {
        content.to_string()
    }

    fn heading(&self, level: u8, id: Option<&str>, content: &str) -> String {
        match id {
            Some(id) => format!("<h{level} id=\"{}\">{content}</h{level}>", attr(id)),
            None => format!("<h{level}>{content}</h{level}>"),
        }
    }

    fn rule(&self) -> String {
        "<hr />".to_string()
    }

    fn code_block(&self, language: Option<&str>, code: &str) -> String {
        let open = match language {
            Some(lang) => format!("<pre><code class=\"language-{}\">", attr(lang)),
            None => "<pre><code>".to_string(),
        };
        format!("{open}{}\n</code></pre>", text(code))
    }

    fn blockquote(&self, content: &str) -> String {
        format!("<blockquote>\n{content}\n</blockquote>")
    }

    fn list(&self, kind: ListKind, start: Option<u64>, items: &[String]) -> String {
        let (open, close) = match (kind, start) {
            (ListKind::Bullet, _) => ("<ul>".to_string(), "</ul>"),
            (ListKind::Ordered, Some(n)) => (format!("<ol start=\"{n}\">"), "</ol>"),
            (ListKind::Ordered, None) => ("<ol>".to_string(), "</ol>"),
        };
        let mut out = open;
        out.push('\n');
        for item in items {
            writeln!(out, "<li>{item}</li>").ok();
        }
        out.push_str(close);
        out
    }

    fn definition_list(&self, entries: &[Definition]) -> String {
        let mut out = String::from("<dl>\n");
        for entry in entries {
            for term in &entry.terms {
                writeln!(out, "<dt>{term}</dt>").ok();
            }
            for definition in &entry.definitions {
                writeln!(out, "<dd>{definition}</dd>").ok();
            }
        }
        out.push_str("</dl>");
        out
    }

    fn table(&self, table: &TableMarkup) -> String {
        let cell = |out: &mut String, tag: &str, index: usize, content: &str| {
            match table.aligns.get(index).and_then(|a| a.as_str()) {
                Some(align) => writeln!(out, "<{tag} align=\"{align}\">{content}</{tag}>"),
                None => writeln!(out, "<{tag}>{content}</{tag}>"),
            }
            .ok();
        };

        let mut out = String::from("<table>\n<thead>\n<tr>\n");
        for (i, content) in table.header.iter().enumerate() {
            cell(&mut out, "th", i, content);
        }
        out.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &table.rows {
            out.push_str("<tr>\n");
            for (i, content) in row.iter().enumerate() {
                cell(&mut out, "td", i, content);
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>");
        out
    }

    fn emphasis(&self, strong: bool) -> (&'static str, &'static str) {
        if strong {
            ("<strong>", "</strong>")
        } else {
            ("<em>", "</em>")
        }
    }

    fn code_span(&self, code: &str) -> String {
        format!("<code>{}</code>", text(code))
    }

    fn link(&self, href: &str, title: Option<&str>) -> (String, String) {
        let open = match title {
            Some(title) => format!("<a href=\"{}\" title=\"{}\">", attr(href), attr(title)),
            None => format!("<a href=\"{}\">", attr(href)),
        };
        (open, "</a>".to_string())
    }

    fn image(&self, src: &str, alt: &str, title: Option<&str>) -> String {
        let mut out = format!("<img src=\"{}\" alt=\"{}\"", attr(src), attr(alt));
        if let Some(title) = title {
            write!(out, " title=\"{}\"", attr(title)).ok();
        }
        out.push_str(" />");
        out
    }

    fn line_break(&self) -> &'static str {
        "<br />"
    }

    fn escape_text(&self, value: &str) -> String {
        text(value)
    }
}
