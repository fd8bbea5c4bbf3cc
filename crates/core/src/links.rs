use crate::MarkupError;
use std::collections::HashMap;

/// Target of a named link reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDefinition {
    /// Link target.
    pub href: String,
    /// Optional title.
    pub title: Option<String>,
}

/// Document-scoped map of `[name]: href "title"` definitions.
///
/// Filled during the prepare phase, frozen before blocks are parsed.
#[derive(Debug, Default)]
pub struct LinkTable {
    entries: HashMap<String, LinkDefinition>,
    frozen: bool,
}

impl LinkTable {
    /// Creates an empty, writable table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a definition; a later definition of the same name wins.
    pub fn insert(&mut self, name: &str, definition: LinkDefinition) -> Result<(), MarkupError> {
        if self.frozen {
            return Err(MarkupError::internal(format!(
                "link definition '{}' added after the prepare phase",
                name
            )));
        }
        self.entries.insert(normalize_label(name), definition);
        Ok(())
    }

    /// Looks up a reference, ignoring case and whitespace differences.
    pub fn get(&self, name: &str) -> Option<&LinkDefinition> {
        self.entries.get(&normalize_label(name))
    }

    /// Makes the table read-only.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the table is read-only.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no definitions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lowercases and collapses internal whitespace runs to one space.
pub fn normalize_label(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}
