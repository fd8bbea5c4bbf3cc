//! The document engine: runs the four phases over one document.

use crate::markup::renderer_for;
use crate::registry::build_pipeline;
use solmark_core::text::prepare_source;
use solmark_core::{
    Context, ConvertOptions, Diagnostics, Limit, Markup, MarkupError, Phase, Pipeline,
};

/// Output of a conversion together with its warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Rendered markup.
    pub output: String,
    /// Non-fatal findings.
    pub diagnostics: Diagnostics,
}

/// A configured converter.
///
/// Holds only read-only configuration, so one instance can serve many
/// documents, including from several threads at once. All per-document state
/// lives in a [`Context`] created by each call.
pub struct Markdown {
    options: ConvertOptions,
    pipeline: Pipeline,
    markup: Box<dyn Markup>,
}

impl std::fmt::Debug for Markdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markdown")
            .field("options", &self.options)
            .field("pipeline", &self.pipeline)
            .field("format", &self.markup.format())
            .finish()
    }
}

impl Markdown {
    /// Validates `options` and builds the pipeline and renderer they describe.
    pub fn new(options: ConvertOptions) -> Result<Self, MarkupError> {
        options.validate()?;
        let pipeline = build_pipeline(&options)?;
        let markup = renderer_for(options.effective_format());
        Ok(Self {
            options,
            pipeline,
            markup,
        })
    }

    /// Uses a custom pipeline and renderer instead of the dialect defaults.
    pub fn with_parts(
        options: ConvertOptions,
        pipeline: Pipeline,
        markup: Box<dyn Markup>,
    ) -> Result<Self, MarkupError> {
        options.validate()?;
        Ok(Self {
            options,
            pipeline,
            markup,
        })
    }

    /// Options this engine was built with.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// The plugin pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Converts one document.
    pub fn convert(&self, text: &str) -> Result<String, MarkupError> {
        self.convert_with_diagnostics(text)
            .map(|conversion| conversion.output)
    }

    /// Converts one document and returns the warnings raised along the way.
    pub fn convert_with_diagnostics(&self, text: &str) -> Result<Conversion, MarkupError> {
        let max = self.options.max_input_bytes;
        if text.len() > max {
            return Err(MarkupError::limit(Limit::InputBytes, text.len(), max));
        }

        let mut ctx = Context::new(&self.pipeline, self.markup.as_ref(), &self.options);
        let source = prepare_source(text, self.options.tab_width);

        let prepared = self.pipeline.run_phase(Phase::Prepare, &source, &mut ctx)?;
        ctx.links_mut().freeze();
        log::debug!(
            "prepare: {} link definitions, {} tokens",
            ctx.links().len(),
            ctx.tokens().len()
        );

        let blocks = ctx.run_blocks(&prepared)?;
        let resolved = ctx.tokens().resolve(&blocks)?;
        log::debug!("blocks resolved: {} tokens", ctx.tokens().len());

        let cleaned = self.pipeline.run_phase(Phase::Cleanup, &resolved, &mut ctx)?;
        let diagnostics = ctx.into_diagnostics();
        if diagnostics.has_warnings() {
            log::debug!("conversion finished with {} warnings", diagnostics.count());
        }

        let trimmed = cleaned.trim();
        let output = if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}\n")
        };
        Ok(Conversion {
            output,
            diagnostics,
        })
    }
}

/// Converts `text` with a one-off engine built from `options`.
///
/// ```
/// use solmark::{ConvertOptions, convert};
///
/// let html = convert("Hello *world*", &ConvertOptions::default()).unwrap();
/// assert_eq!(html, "<p>Hello <em>world</em></p>\n");
/// ```
pub fn convert(text: &str, options: &ConvertOptions) -> Result<String, MarkupError> {
    Markdown::new(options.clone())?.convert(text)
}
