//! The plugin capability.

use crate::{Context, MarkupError};
use std::borrow::Cow;

/// The four sequential stages of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Whole-document rewriting before block parsing.
    Prepare,
    /// Block structure recognition.
    Block,
    /// Inline rewriting of one block's text.
    Span,
    /// Post-processing of the resolved output.
    Cleanup,
}

/// Static description of a plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Unique plugin name.
    pub name: &'static str,
    /// Phases the plugin takes part in.
    pub phases: &'static [Phase],
    /// Markdown-significant characters the plugin reacts to; a backslash
    /// before any of them makes it literal.
    pub special_chars: &'static str,
}

/// One transformation step of the pipeline.
///
/// Plugins hold no per-document state: everything that changes during a
/// conversion lives in the [`Context`]. Text produced by other plugins is
/// opaque placeholders, so applying a plugin to its own output changes nothing.
pub trait Plugin: Send + Sync {
    /// Name, phases and special characters.
    fn descriptor(&self) -> Descriptor;

    /// Transforms `text` for `phase`; returns the input borrowed when nothing matched.
    fn apply<'t>(
        &self,
        phase: Phase,
        text: &'t str,
        ctx: &mut Context<'_>,
    ) -> Result<Cow<'t, str>, MarkupError>;
}
