use thiserror::Error;

/// Resource bounds enforced while converting a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Size of the source text in bytes.
    InputBytes,
    /// Depth of nested block constructs (quotes, list items) or inline
    /// wrappers (link text, emphasis).
    NestingDepth,
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::InputBytes => write!(f, "input size"),
            Limit::NestingDepth => write!(f, "nesting depth"),
        }
    }
}

/// Errors that can abort a conversion.
///
/// Malformed Markdown is never reported here; it degrades to literal text.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// Programming defect: token cycle, unknown placeholder, plugin contract violation.
    #[error("Internal error: {0}")]
    Internal(String),
    /// Input exceeded a configured limit.
    #[error("Resource limit exceeded: {limit} is {actual}, maximum is {max}")]
    ResourceLimitExceeded {
        /// Which limit was hit
        limit: Limit,
        /// Observed value
        actual: usize,
        /// Configured maximum
        max: usize,
    },
    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// Options record could not be deserialized.
    #[error("Invalid options: {0}")]
    Options(#[from] serde_json::Error),
}

impl MarkupError {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a resource limit error
    pub fn limit(limit: Limit, actual: usize, max: usize) -> Self {
        Self::ResourceLimitExceeded { limit, actual, max }
    }
}

/// Non-fatal findings recorded while converting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Code fence opened but never closed; the lines were kept as text
    UnclosedCodeFence {
        /// Fence marker character (backtick or tilde)
        marker: char,
        /// The opening line
        context: String,
    },
    /// `[text][id]` or `![alt][id]` without a matching definition
    UnresolvedReference {
        /// Normalized reference name
        name: String,
    },
    /// Block-level HTML without a closing tag; the lines were kept as text
    UnclosedHtmlBlock {
        /// Tag name
        tag: String,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnclosedCodeFence { marker, context } => {
                write!(f, "Unclosed code fence ({}), near '{}'", marker, context)
            }
            Warning::UnresolvedReference { name } => {
                write!(f, "Unresolved link reference '{}'", name)
            }
            Warning::UnclosedHtmlBlock { tag } => {
                write!(f, "Unclosed HTML block <{}>", tag)
            }
        }
    }
}

/// Collection of warnings for one conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Warnings in the order they were found
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning
    pub fn add_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Number of warnings
    pub fn count(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_error_message() {
        let err = MarkupError::limit(Limit::NestingDepth, 33, 32);
        assert_eq!(
            err.to_string(),
            "Resource limit exceeded: nesting depth is 33, maximum is 32"
        );
    }

    #[test]
    fn warning_display() {
        let warning = Warning::UnclosedCodeFence {
            marker: '`',
            context: "```rust".into(),
        };
        assert_eq!(warning.to_string(), "Unclosed code fence (`), near '```rust'");
    }

    #[test]
    fn diagnostics_counting() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_warnings());
        diagnostics.add_warning(Warning::UnresolvedReference { name: "x".into() });
        assert!(diagnostics.has_warnings());
        assert_eq!(diagnostics.count(), 1);
    }
}
