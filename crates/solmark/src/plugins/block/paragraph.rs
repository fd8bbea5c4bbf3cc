use solmark_core::text::{is_blank, join_lines};
use solmark_core::{Context, Descriptor, MarkupError, Phase, Plugin};
use std::borrow::Cow;

/// Wraps every unclaimed chunk of text in a paragraph.
///
/// Must run last in the block phase. Runs the span phase on each chunk;
/// inside tight list items the chunk is emitted through
/// [`Markup::tight_block`](solmark_core::Markup::tight_block) instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Paragraph;

impl Plugin for Paragraph {
    fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: "paragraph",
            phases: &[Phase::Block],
            special_chars: "",
        }
    }

    fn apply<'t>(
        &self,
        _phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError> {
        let mut blocks = Vec::new();
        let mut chunk: Vec<&str> = Vec::new();

        for line in text.lines() {
            if ctx.tokens().is_empty_token(line) {
                continue;
            }
            if is_blank(line) {
                if !chunk.is_empty() {
                    blocks.push(render_chunk(&chunk, ctx)?);
                    chunk.clear();
                }
                continue;
            }
            chunk.push(line);
        }
        if !chunk.is_empty() {
            blocks.push(render_chunk(&chunk, ctx)?);
        }

        let mut out = blocks.join("\n\n");
        out.push_str("\n\n");
        Ok(Cow::Owned(out))
    }
}

fn render_chunk(chunk: &[&str], ctx: &mut Context<'_>) -> Result<String, MarkupError> {
    if let [only] = chunk
        && ctx.is_token(only)
    {
        return Ok(only.trim().to_string());
    }

    let raw = join_lines(chunk);
    let inline = ctx.run_spans(raw.trim())?;
    let markup = if ctx.is_tight() {
        ctx.markup().tight_block(&inline)
    } else {
        ctx.markup().paragraph(&inline)
    };
    Ok(ctx.reserve(markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::HtmlMarkup;
    use solmark_core::{ConvertOptions, Pipeline};

    #[test]
    fn wraps_chunks_and_keeps_tokens() {
        let mut pipeline = Pipeline::new();
        pipeline.register(Paragraph).unwrap();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &HtmlMarkup, &options);

        let hidden = ctx.reserve("");
        let block = ctx.reserve("<hr />");
        let text = format!("one\ntwo\n{hidden}\n\n{block}\n\nthree\n\n");
        let out = ctx.run_blocks(&text).unwrap();
        let html = ctx.tokens().resolve(&out).unwrap();
        assert_eq!(html, "<p>one\ntwo</p>\n\n<hr />\n\n<p>three</p>\n\n");
    }

    #[test]
    fn tight_items_are_bare() {
        let mut pipeline = Pipeline::new();
        pipeline.register(Paragraph).unwrap();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &HtmlMarkup, &options);

        let out = ctx.run_item_blocks("item\n\n", true).unwrap();
        assert_eq!(ctx.tokens().resolve(&out).unwrap(), "item\n\n");
    }
}
