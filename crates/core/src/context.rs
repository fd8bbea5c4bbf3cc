//! Per-conversion state threaded through every plugin call.

use crate::error::{Diagnostics, Limit, Warning};
use crate::links::LinkTable;
use crate::markup::Markup;
use crate::options::ConvertOptions;
use crate::pipeline::Pipeline;
use crate::plugin::Phase;
use crate::slug::Slugger;
use crate::token::TokenStore;
use crate::MarkupError;

/// State of one `convert` call.
///
/// Created fresh for every document; nothing in it outlives the call. The
/// pipeline, renderer and options are shared read-only.
pub struct Context<'p> {
    pipeline: &'p Pipeline,
    markup: &'p dyn Markup,
    options: &'p ConvertOptions,
    tokens: TokenStore,
    links: LinkTable,
    slugger: Slugger,
    diagnostics: Diagnostics,
    depth: usize,
    inline_depth: usize,
    list_level: usize,
    tight: bool,
}

impl<'p> Context<'p> {
    /// Creates the state for one conversion.
    pub fn new(
        pipeline: &'p Pipeline,
        markup: &'p dyn Markup,
        options: &'p ConvertOptions,
    ) -> Self {
        Self {
            pipeline,
            markup,
            options,
            tokens: TokenStore::new(),
            links: LinkTable::new(),
            slugger: Slugger::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            inline_depth: 0,
            list_level: 0,
            tight: false,
        }
    }

    /// The pipeline driving this conversion.
    pub fn pipeline(&self) -> &'p Pipeline {
        self.pipeline
    }

    /// The renderer for the configured output format.
    pub fn markup(&self) -> &'p dyn Markup {
        self.markup
    }

    /// Conversion options.
    pub fn options(&self) -> &'p ConvertOptions {
        self.options
    }

    /// Columns per tab stop.
    pub fn tab_width(&self) -> usize {
        self.options.tab_width
    }

    /// Placeholder store.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Stores rendered markup and returns its placeholder.
    pub fn reserve(&mut self, payload: impl Into<String>) -> String {
        self.tokens.reserve(payload)
    }

    /// Whether `text` is exactly one placeholder.
    pub fn is_token(&self, text: &str) -> bool {
        self.tokens.is_token(text)
    }

    /// Link reference definitions.
    pub fn links(&self) -> &LinkTable {
        &self.links
    }

    /// Mutable link table; inserts fail once the table is frozen.
    pub fn links_mut(&mut self) -> &mut LinkTable {
        &mut self.links
    }

    /// Header id generator.
    pub fn slugger_mut(&mut self) -> &mut Slugger {
        &mut self.slugger
    }

    /// Records a non-fatal finding; a finding already recorded is ignored.
    pub fn warn(&mut self, warning: Warning) {
        if self.diagnostics.warnings.contains(&warning) {
            return;
        }
        log::debug!("{}", warning);
        self.diagnostics.add_warning(warning);
    }

    /// Warnings recorded so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consumes the context, returning its warnings.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Whether a backslash before `c` makes it literal.
    pub fn is_escapable(&self, c: char) -> bool {
        self.pipeline.escapable().contains(c)
    }

    /// Current block nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of enclosing list items.
    pub fn list_level(&self) -> usize {
        self.list_level
    }

    /// Whether paragraphs are currently emitted as tight item content.
    pub fn is_tight(&self) -> bool {
        self.tight
    }

    /// Runs the block phase on `text` (document body or quote content).
    pub fn run_blocks(&mut self, text: &str) -> Result<String, MarkupError> {
        let tight = std::mem::replace(&mut self.tight, false);
        let result = self.nested(text);
        self.tight = tight;
        result
    }

    /// Runs the block phase on the content of a list item or definition.
    pub fn run_item_blocks(&mut self, text: &str, tight: bool) -> Result<String, MarkupError> {
        let saved = std::mem::replace(&mut self.tight, tight);
        self.list_level += 1;
        let result = self.nested(text);
        self.list_level -= 1;
        self.tight = saved;
        result
    }

    fn nested(&mut self, text: &str) -> Result<String, MarkupError> {
        let max = self.options.max_nesting_depth;
        if self.depth >= max {
            return Err(MarkupError::limit(Limit::NestingDepth, self.depth + 1, max));
        }
        self.depth += 1;
        let pipeline = self.pipeline;
        let result = pipeline.run_phase(Phase::Block, text, self);
        self.depth -= 1;
        result
    }

    /// Runs `f` one level deeper inside an inline wrapper (link text, emphasis).
    ///
    /// Inline nesting has its own counter, bounded by the same maximum as
    /// block nesting.
    pub fn nest<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, MarkupError>,
    ) -> Result<T, MarkupError> {
        let max = self.options.max_nesting_depth;
        if self.inline_depth >= max {
            return Err(MarkupError::limit(
                Limit::NestingDepth,
                self.inline_depth + 1,
                max,
            ));
        }
        self.inline_depth += 1;
        let result = f(self);
        self.inline_depth -= 1;
        result
    }

    /// Runs the span phase on one block's inline text.
    pub fn run_spans(&mut self, text: &str) -> Result<String, MarkupError> {
        let pipeline = self.pipeline;
        pipeline.run_phase(Phase::Span, text, self)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::markup::{Definition, ListKind, Markup, TableMarkup};
    use crate::options::OutputFormat;

    /// Bracket-style renderer for unit tests.
    pub struct BracketMarkup;

    impl Markup for BracketMarkup {
        fn format(&self) -> OutputFormat {
            OutputFormat::Html
        }
        fn paragraph(&self, content: &str) -> String {
            format!("[p]{content}[/p]")
        }
        fn tight_block(&self, content: &str) -> String {
            content.to_string()
        }
        fn heading(&self, level: u8, _id: Option<&str>, content: &str) -> String {
            format!("[h{level}]{content}[/h{level}]")
        }
        fn rule(&self) -> String {
            "[hr]".into()
        }
        fn code_block(&self, _language: Option<&str>, code: &str) -> String {
            format!("[pre]{code}[/pre]")
        }
        fn blockquote(&self, content: &str) -> String {
            format!("[q]{content}[/q]")
        }
        fn list(&self, _kind: ListKind, _start: Option<u64>, items: &[String]) -> String {
            format!("[list]{}[/list]", items.join(","))
        }
        fn definition_list(&self, _entries: &[Definition]) -> String {
            "[dl]".into()
        }
        fn table(&self, _table: &TableMarkup) -> String {
            "[table]".into()
        }
        fn emphasis(&self, strong: bool) -> (&'static str, &'static str) {
            if strong { ("[b]", "[/b]") } else { ("[i]", "[/i]") }
        }
        fn code_span(&self, code: &str) -> String {
            format!("[c]{code}[/c]")
        }
        fn link(&self, href: &str, _title: Option<&str>) -> (String, String) {
            (format!("[a {href}]"), "[/a]".into())
        }
        fn image(&self, src: &str, alt: &str, _title: Option<&str>) -> String {
            format!("[img {src} {alt}]")
        }
        fn line_break(&self) -> &'static str {
            "[br]"
        }
        fn escape_text(&self, text: &str) -> String {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::BracketMarkup;
    use super::*;
    use crate::plugin::{Descriptor, Plugin};
    use std::borrow::Cow;

    /// Wraps the whole text in a quote and recurses once per leading `>`.
    struct Quote;

    impl Plugin for Quote {
        fn descriptor(&self) -> Descriptor {
            Descriptor {
                name: "quote",
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
            match text.strip_prefix('>') {
                Some(inner) => {
                    let inner = ctx.run_blocks(inner)?;
                    let html = ctx.markup().blockquote(&inner);
                    Ok(Cow::Owned(ctx.reserve(html)))
                }
                None => Ok(Cow::Borrowed(text)),
            }
        }
    }

    /// Uppercases text in the span phase and records the depth it ran at.
    struct Shout;

    impl Plugin for Shout {
        fn descriptor(&self) -> Descriptor {
            Descriptor {
                name: "shout",
                phases: &[Phase::Span],
                special_chars: "!",
            }
        }

        fn apply<'t>(
            &self,
            _phase: Phase,
            text: &'t str,
            _ctx: &mut Context<'_>,
        ) -> Result<Cow<'t, str>, MarkupError> {
            Ok(Cow::Owned(text.to_uppercase()))
        }
    }

    fn pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.register(Quote).unwrap();
        pipeline.register(Shout).unwrap();
        pipeline
    }

    #[test]
    fn nested_blocks_resolve() {
        let pipeline = pipeline();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        let out = ctx.run_blocks(">>x").unwrap();
        assert_eq!(ctx.tokens().resolve(&out).unwrap(), "[q][q]x[/q][/q]");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn nesting_limit_is_enforced() {
        let pipeline = pipeline();
        let options = ConvertOptions {
            max_nesting_depth: 3,
            ..ConvertOptions::default()
        };
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        assert!(ctx.run_blocks(">>x").is_ok());
        let err = ctx.run_blocks(">>>x").unwrap_err();
        assert!(matches!(
            err,
            MarkupError::ResourceLimitExceeded {
                limit: Limit::NestingDepth,
                ..
            }
        ));
    }

    #[test]
    fn item_blocks_track_level_and_tightness() {
        let pipeline = pipeline();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        ctx.run_item_blocks("x", true).unwrap();
        assert_eq!(ctx.list_level(), 0);
        assert!(!ctx.is_tight());
    }

    #[test]
    fn spans_run_in_order() {
        let pipeline = pipeline();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        assert_eq!(ctx.run_spans("hey").unwrap(), "HEY");
    }

    #[test]
    fn escapable_includes_plugin_chars() {
        let pipeline = pipeline();
        let options = ConvertOptions::default();
        let ctx = Context::new(&pipeline, &BracketMarkup, &options);
        assert!(ctx.is_escapable('*'));
        assert!(ctx.is_escapable('!'));
        assert!(!ctx.is_escapable('|'));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut pipeline = pipeline();
        assert!(matches!(
            pipeline.register(Shout),
            Err(MarkupError::Config(_))
        ));
        assert_eq!(pipeline.names(), vec!["quote", "shout"]);
        assert_eq!(pipeline.phase_names(Phase::Span), vec!["shout"]);
    }

    #[test]
    fn inline_nesting_is_bounded() {
        let pipeline = pipeline();
        let options = ConvertOptions {
            max_nesting_depth: 2,
            ..ConvertOptions::default()
        };
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        let inner = ctx.nest(|ctx| ctx.nest(|ctx| ctx.run_spans("ok")));
        assert_eq!(inner.unwrap(), "OK");

        let err = ctx
            .nest(|ctx| ctx.nest(|ctx| ctx.nest(|ctx| ctx.run_spans("deep"))))
            .unwrap_err();
        assert!(matches!(
            err,
            MarkupError::ResourceLimitExceeded {
                limit: Limit::NestingDepth,
                actual: 3,
                max: 2
            }
        ));
        assert!(ctx.nest(|ctx| ctx.run_spans("again")).is_ok());
    }

    #[test]
    fn repeated_findings_are_recorded_once() {
        let pipeline = pipeline();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        ctx.warn(Warning::UnresolvedReference { name: "a".into() });
        ctx.warn(Warning::UnresolvedReference { name: "a".into() });
        ctx.warn(Warning::UnresolvedReference { name: "b".into() });
        assert_eq!(ctx.diagnostics().count(), 2);
    }

    #[test]
    fn links_and_diagnostics_are_per_context() {
        let pipeline = pipeline();
        let options = ConvertOptions::default();
        let mut ctx = Context::new(&pipeline, &BracketMarkup, &options);
        ctx.warn(Warning::UnresolvedReference { name: "a".into() });
        assert_eq!(ctx.diagnostics().count(), 1);

        let fresh = Context::new(&pipeline, &BracketMarkup, &options);
        assert!(!fresh.diagnostics().has_warnings());
        assert!(fresh.links().is_empty());
    }
}
