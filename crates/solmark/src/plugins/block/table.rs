use super::{Claim, Cursor, rewrite_blocks};
use solmark_core::text::is_blank;
use solmark_core::{Align, Context, Descriptor, MarkupError, Phase, Plugin, TableMarkup};
use std::borrow::Cow;

/// Pipe tables: a header row, a delimiter row and body rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Table;

impl Table {
    fn claim(
        &self,
        cursor: &Cursor<'_>,
        ctx: &mut Context<'_>,
    ) -> Result<Option<Claim>, MarkupError> {
        let header_line = cursor.line();
        if !header_line.contains('|') {
            return Ok(None);
        }
        let Some(aligns) = cursor.next_line().and_then(delimiter_row) else {
            return Ok(None);
        };
        let header = split_row(header_line);
        if header.is_empty() {
            return Ok(None);
        }

        let lines = cursor.lines;
        let columns = header.len();
        let mut end = cursor.index + 2;
        while end < lines.len()
            && !is_blank(lines[end])
            && lines[end].contains('|')
            && !ctx.is_token(lines[end])
        {
            end += 1;
        }

        let mut table = TableMarkup {
            aligns: fit(aligns, columns, Align::None),
            ..TableMarkup::default()
        };
        for cell in &header {
            table.header.push(ctx.run_spans(cell)?);
        }
        for line in &lines[cursor.index + 2..end] {
            let mut row = Vec::with_capacity(columns);
            for cell in fit(split_row(line), columns, "") {
                row.push(ctx.run_spans(cell)?);
            }
            table.rows.push(row);
        }

        let markup = ctx.markup().table(&table);
        Ok(Some(Claim {
            lines: end - cursor.index,
            markup,
        }))
    }
}

impl Plugin for Table {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "table",
            phases: &[Phase::Block],
            special_chars: "|:",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        rewrite_blocks(text, ctx, |cursor, ctx| self.claim(cursor, ctx))
    }
}

/// Pads or truncates to exactly `columns` entries.
fn fit<T: Clone>(mut cells: Vec<T>, columns: usize, filler: T) -> Vec<T> {
    cells.resize(columns, filler);
    cells
}

/// Parses `| :--- | :---: | ---: |` into alignments.
fn delimiter_row(line: &str) -> Option<Vec<Align>> {
    let trimmed = line.trim();
    if !trimmed.contains('-') || !trimmed.contains(['|', ':']) {
        return None;
    }
    if !trimmed.chars().all(|c| matches!(c, '-' | ':' | '|' | ' ')) {
        return None;
    }
    let cells = split_row(trimmed);
    let mut aligns = Vec::with_capacity(cells.len());
    for cell in cells {
        if !cell.contains('-') {
            return None;
        }
        let align = match (cell.starts_with(':'), cell.ends_with(':')) {
            (true, true) => Align::Center,
            (true, false) => Align::Left,
            (false, true) => Align::Right,
            (false, false) => Align::None,
        };
        aligns.push(align);
    }
    Some(aligns)
}

/// Splits on `|` outside code spans and not preceded by a backslash,
/// dropping the optional outer pipes. Cells are trimmed.
fn split_row(line: &str) -> Vec<&str> {
    let mut row = line.trim();
    row = row.strip_prefix('|').unwrap_or(row);
    if row.ends_with('|') && !row.ends_with("\\|") {
        row = &row[..row.len() - 1];
    }

    let bytes = row.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut code_run = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'`' => {
                let run = bytes[i..].iter().take_while(|b| **b == b'`').count();
                code_run = match code_run {
                    0 => run,
                    open if open == run => 0,
                    open => open,
                };
                i += run - 1;
            }
            b'|' if code_run == 0 => {
                cells.push(row[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    cells.push(row[start..].trim());
    cells
}
