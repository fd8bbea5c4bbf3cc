//! Ordered plugin registry and phase runner.

use crate::plugin::{Phase, Plugin};
use crate::{Context, MarkupError};
use std::borrow::Cow;

/// Characters every dialect lets a backslash escape.
pub const BASE_ESCAPABLE: &str = "\\`*_{}[]()>#+-.!";

/// Plugins grouped by phase, in registration order.
#[derive(Default)]
pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
    prepare: Vec<usize>,
    block: Vec<usize>,
    span: Vec<usize>,
    cleanup: Vec<usize>,
    escapable: String,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("plugins", &self.names())
            .field("escapable", &self.escapable)
            .finish()
    }
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self {
            escapable: BASE_ESCAPABLE.to_string(),
            ..Self::default()
        }
    }

    /// Appends a plugin to every phase it declares.
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<(), MarkupError> {
        self.register_boxed(Box::new(plugin))
    }

    /// Appends an already boxed plugin.
    pub fn register_boxed(&mut self, plugin: Box<dyn Plugin>) -> Result<(), MarkupError> {
        let descriptor = plugin.descriptor();
        if self.names().contains(&descriptor.name) {
            return Err(MarkupError::config(format!(
                "plugin '{}' registered twice",
                descriptor.name
            )));
        }
        if descriptor.phases.is_empty() {
            return Err(MarkupError::config(format!(
                "plugin '{}' declares no phase",
                descriptor.name
            )));
        }

        let index = self.plugins.len();
        for phase in descriptor.phases {
            self.slots_mut(*phase).push(index);
        }
        for c in descriptor.special_chars.chars() {
            if !self.escapable.contains(c) {
                self.escapable.push(c);
            }
        }
        self.plugins.push(plugin);
        Ok(())
    }

    /// Registered plugin names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.descriptor().name).collect()
    }

    /// Names of the plugins run for `phase`, in order.
    pub fn phase_names(&self, phase: Phase) -> Vec<&'static str> {
        self.slots(phase)
            .iter()
            .map(|&i| self.plugins[i].descriptor().name)
            .collect()
    }

    /// Characters a backslash may escape.
    pub fn escapable(&self) -> &str {
        &self.escapable
    }

    fn slots(&self, phase: Phase) -> &[usize] {
        match phase {
            Phase::Prepare => &self.prepare,
            Phase::Block => &self.block,
            Phase::Span => &self.span,
            Phase::Cleanup => &self.cleanup,
        }
    }

    fn slots_mut(&mut self, phase: Phase) -> &mut Vec<usize> {
        match phase {
            Phase::Prepare => &mut self.prepare,
            Phase::Block => &mut self.block,
            Phase::Span => &mut self.span,
            Phase::Cleanup => &mut self.cleanup,
        }
    }

    /// Feeds `text` through every plugin of `phase` in registration order.
    pub fn run_phase(
        &self,
        phase: Phase,
        text: &str,
        ctx: &mut Context<'_>,
    ) -> Result<String, MarkupError> {
        let mut current = text.to_string();
        for &index in self.slots(phase) {
            let plugin = &self.plugins[index];
            let next = match plugin.apply(phase, &current, ctx)? {
                Cow::Borrowed(_) => None,
                Cow::Owned(changed) => Some(changed),
            };
            if let Some(next) = next {
                log::trace!(
                    "{:?} plugin '{}' rewrote {} -> {} bytes",
                    phase,
                    plugin.descriptor().name,
                    current.len(),
                    next.len()
                );
                current = next;
            }
        }
        Ok(current)
    }
}
