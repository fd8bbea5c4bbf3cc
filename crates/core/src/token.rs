//! Placeholder tokens standing in for already-rendered markup.
//!
//! A key looks like `\u{2}SSSSSSSSCCCCCCCCCCCCCCCC\u{3}`: a salt unique to the
//! store and a counter, both in hex. Keys always have [`KEY_LEN`] bytes.

use crate::MarkupError;
use std::collections::HashMap;

/// First byte of every placeholder.
pub const TOKEN_OPEN: char = '\u{2}';
/// Last byte of every placeholder.
pub const TOKEN_CLOSE: char = '\u{3}';
/// Byte length of every placeholder.
pub const KEY_LEN: usize = 26;

/// One reserved fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Placeholder spliced into the working buffer.
    pub key: String,
    /// Final markup the placeholder stands for.
    pub payload: String,
    /// Reservation order within the store.
    pub sequence: u64,
}

/// Append-only registry of placeholders for one conversion.
#[derive(Debug)]
pub struct TokenStore {
    salt: u32,
    next: u64,
    entries: HashMap<String, Token>,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore {
    /// Creates an empty store with a fresh random salt.
    pub fn new() -> Self {
        Self::with_salt(rand::random::<u32>())
    }

    fn with_salt(salt: u32) -> Self {
        Self {
            salt,
            next: 0,
            entries: HashMap::new(),
        }
    }

    fn key_for(&self, sequence: u64) -> String {
        format!("{TOKEN_OPEN}{:08x}{:016x}{TOKEN_CLOSE}", self.salt, sequence)
    }

    /// Stores `payload` under a fresh placeholder and returns the placeholder.
    ///
    /// An empty payload marks a span that should disappear from the output.
    pub fn reserve(&mut self, payload: impl Into<String>) -> String {
        let sequence = self.next;
        self.next += 1;
        let key = self.key_for(sequence);
        self.entries.insert(
            key.clone(),
            Token {
                key: key.clone(),
                payload: payload.into(),
                sequence,
            },
        );
        key
    }

    /// Number of reserved tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been reserved yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when `text`, ignoring surrounding whitespace, is exactly one placeholder of this store.
    pub fn is_token(&self, text: &str) -> bool {
        let text = text.trim();
        text.len() == KEY_LEN && self.entries.contains_key(text)
    }

    /// True when `text` is exactly one placeholder whose payload is empty.
    pub fn is_empty_token(&self, text: &str) -> bool {
        self.entries
            .get(text.trim())
            .is_some_and(|token| token.payload.is_empty())
    }

    /// Replaces every placeholder in `text` with its payload, recursively.
    pub fn resolve(&self, text: &str) -> Result<String, MarkupError> {
        let mut out = String::with_capacity(text.len());
        let mut stack = Vec::new();
        self.resolve_into(text, &mut out, &mut stack)?;
        Ok(out)
    }

    fn resolve_into<'s>(
        &'s self,
        text: &str,
        out: &mut String,
        stack: &mut Vec<&'s str>,
    ) -> Result<(), MarkupError> {
        let mut rest = text;
        while let Some(start) = rest.find(TOKEN_OPEN) {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];
            let token = candidate
                .get(..KEY_LEN)
                .and_then(|key| self.entries.get(key))
                .ok_or_else(|| {
                    let shown: String = candidate.chars().take(KEY_LEN).collect();
                    MarkupError::internal(format!("unknown placeholder {:?}", shown))
                })?;

            if stack.contains(&token.key.as_str()) {
                return Err(MarkupError::internal(format!(
                    "placeholder cycle through token #{}",
                    token.sequence
                )));
            }
            stack.push(&token.key);
            self.resolve_into(&token.payload, out, stack)?;
            stack.pop();

            rest = &candidate[KEY_LEN..];
        }
        out.push_str(rest);
        Ok(())
    }
}
