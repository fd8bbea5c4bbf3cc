use super::{attr, text};
use solmark_core::{Definition, ListKind, Markup, OutputFormat, TableMarkup};
use std::fmt::Write as _;

/// DocBook 5 fragments for API reference pages.
///
/// Assumes the surrounding document declares the `xlink` namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocBookMarkup;

impl Markup for DocBookMarkup {
    fn format(&self) -> OutputFormat {
        OutputFormat::DocBook
    }

    fn paragraph(&self, content: &str) -> String {
        format!("<para>{content}</para>")
    }

    // listitem and varlistentry need block content
    fn tight_block(&self, content: &str) -> String {
        self.paragraph(content)
    }

    fn heading(&self, level: u8, id: Option<&str>, content: &str) -> String {
        match id {
            Some(id) => format!(
                "<bridgehead renderas=\"sect{level}\" xml:id=\"{}\">{content}</bridgehead>",
                attr(id)
            ),
            None => format!("<bridgehead renderas=\"sect{level}\">{content}</bridgehead>"),
        }
    }

    fn rule(&self) -> String {
        "<bridgehead renderas=\"other\" otherrenderas=\"rule\"/>".to_string()
    }

    fn code_block(&self, language: Option<&str>, code: &str) -> String {
        match language {
            Some(lang) => format!(
                "<programlisting language=\"{}\">{}</programlisting>",
                attr(lang),
                text(code)
            ),
            None => format!("<programlisting>{}</programlisting>", text(code)),
        }
    }

    fn blockquote(&self, content: &str) -> String {
        format!("<blockquote>\n{content}\n</blockquote>")
    }

    fn list(&self, kind: ListKind, start: Option<u64>, items: &[String]) -> String {
        let (open, close) = match (kind, start) {
            (ListKind::Bullet, _) => ("<itemizedlist>".to_string(), "</itemizedlist>"),
            (ListKind::Ordered, Some(n)) => (
                format!("<orderedlist startingnumber=\"{n}\">"),
                "</orderedlist>",
            ),
            (ListKind::Ordered, None) => ("<orderedlist>".to_string(), "</orderedlist>"),
        };
        let mut out = open;
        out.push('\n');
        for item in items {
            writeln!(out, "<listitem>{item}</listitem>").ok();
        }
        out.push_str(close);
        out
    }

    fn definition_list(&self, entries: &[Definition]) -> String {
        let mut out = String::from("<variablelist>\n");
        for entry in entries {
            out.push_str("<varlistentry>\n");
            for term in &entry.terms {
                writeln!(out, "<term>{term}</term>").ok();
            }
            writeln!(out, "<listitem>{}</listitem>", entry.definitions.join("\n")).ok();
            out.push_str("</varlistentry>\n");
        }
        out.push_str("</variablelist>");
        out
    }

    fn table(&self, table: &TableMarkup) -> String {
        let row = |out: &mut String, cells: &[String]| {
            out.push_str("<row>\n");
            for cell in cells {
                writeln!(out, "<entry>{cell}</entry>").ok();
            }
            out.push_str("</row>\n");
        };

        let mut out = format!(
            "<informaltable>\n<tgroup cols=\"{}\">\n",
            table.aligns.len()
        );
        for (i, align) in table.aligns.iter().enumerate() {
            match align.as_str() {
                Some(align) => writeln!(out, "<colspec colname=\"c{}\" align=\"{align}\"/>", i + 1),
                None => writeln!(out, "<colspec colname=\"c{}\"/>", i + 1),
            }
            .ok();
        }
        out.push_str("<thead>\n");
        row(&mut out, &table.header);
        out.push_str("</thead>\n<tbody>\n");
        for cells in &table.rows {
            row(&mut out, cells);
        }
        out.push_str("</tbody>\n</tgroup>\n</informaltable>");
        out
    }

    fn emphasis(&self, strong: bool) -> (&'static str, &'static str) {
        if strong {
            ("<emphasis role=\"strong\">", "</emphasis>")
        } else {
            ("<emphasis>", "</emphasis>")
        }
    }

    fn code_span(&self, code: &str) -> String {
        format!("<literal>{}</literal>", text(code))
    }

    fn link(&self, href: &str, title: Option<&str>) -> (String, String) {
        let open = match title {
            Some(title) => format!(
                "<link xlink:href=\"{}\" xlink:title=\"{}\">",
                attr(href),
                attr(title)
            ),
            None => format!("<link xlink:href=\"{}\">", attr(href)),
        };
        (open, "</link>".to_string())
    }

    fn image(&self, src: &str, alt: &str, title: Option<&str>) -> String {
        let mut out = String::from("<inlinemediaobject>");
        if !alt.is_empty() {
            write!(out, "<alt>{}</alt>", text(alt)).ok();
        }
        write!(
            out,
            "<imageobject><imagedata fileref=\"{}\"/></imageobject>",
            attr(src)
        )
        .ok();
        if let Some(title) = title {
            write!(out, "<textobject><phrase>{}</phrase></textobject>", text(title)).ok();
        }
        out.push_str("</inlinemediaobject>");
        out
    }

    fn line_break(&self) -> &'static str {
        "<?linebreak?>"
    }

    fn escape_text(&self, value: &str) -> String {
        text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solmark_core::Align;

    #[test]
    fn emphasis_roles() {
        assert_eq!(
            DocBookMarkup.emphasis(true),
            ("<emphasis role=\"strong\">", "</emphasis>")
        );
        assert_eq!(DocBookMarkup.emphasis(false).0, "<emphasis>");
    }

    #[test]
    fn tight_items_still_get_paragraphs() {
        assert_eq!(DocBookMarkup.tight_block("x"), "<para>x</para>");
    }

    #[test]
    fn table_uses_colspecs() {
        let table = TableMarkup {
            aligns: vec![Align::Right],
            header: vec!["A".into()],
            rows: vec![],
        };
        let out = DocBookMarkup.table(&table);
        assert!(out.starts_with("<informaltable>\n<tgroup cols=\"1\">\n"));
        assert!(out.contains("<colspec colname=\"c1\" align=\"right\"/>"));
        assert!(out.contains("<thead>\n<row>\n<entry>A</entry>\n</row>\n</thead>"));
    }

    #[test]
    fn image_with_alt_and_title() {
        assert_eq!(
            DocBookMarkup.image("a.png", "Alt", Some("T")),
            "<inlinemediaobject><alt>Alt</alt><imageobject><imagedata fileref=\"a.png\"/>\
             </imageobject><textobject><phrase>T</phrase></textobject></inlinemediaobject>"
        );
    }
}
