//! Alias table and context-sensitive alias resolution.
//!
//! A key is only substituted where it occupies the command-name slot of a
//! `comd`: at the start of the line or right after `|`, `;`, `&&`, `||`
//! (spaces and `(` in between are skipped), and followed by end of input,
//! a space, `|`, `;`, `)`, `&&` or `||`. Keys starting with `~` are
//! substituted anywhere. A `\` right before a match is removed and the
//! occurrence is left alone.

use log::debug;

use crate::error::ShellError;

/// Maximum number of characters kept from an alias key.
pub const MAX_KEY_LEN: usize = 50;
/// Maximum number of characters kept from an alias value.
pub const MAX_VALUE_LEN: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub key: String,
    pub value: String,
}

/// Ordered alias table. Iteration (and resolution) follows insertion order.
#[derive(Debug, Default, Clone)]
pub struct AliasTable {
    entries: Vec<Alias>,
    total_value_len: usize,
}

/// Outcome of checking one key occurrence against its context.
#[derive(Debug, PartialEq, Eq)]
enum Occurrence {
    Valid,
    Invalid,
    Escaped,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) an alias.
    ///
    /// The previous definition of `key` is dropped first, then `value` is
    /// resolved against the remaining aliases, so stored values never need
    /// re-expansion. Over-long keys and values are truncated.
    pub fn define(&mut self, key: &str, value: &str) -> Result<(), ShellError> {
        let key: String = key.chars().take(MAX_KEY_LEN).collect();
        if self.remove(&key).is_ok() {
            debug!("alias: replacing existing alias '{key}'");
        }
        let value: String = self.resolve(value).chars().take(MAX_VALUE_LEN).collect();
        self.total_value_len += value.len();
        self.entries.push(Alias { key, value });
        Ok(())
    }

    /// Remove an alias. Fails with [`ShellError::NoSuchAlias`] if `key` is unknown.
    pub fn remove(&mut self, key: &str) -> Result<(), ShellError> {
        let key: String = key.chars().take(MAX_KEY_LEN).collect();
        let Some(pos) = self.entries.iter().position(|a| a.key == key) else {
            return Err(ShellError::NoSuchAlias(key));
        };
        let removed = self.entries.remove(pos);
        self.total_value_len -= removed.value.len();
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|a| a.key == key)
            .map(|a| a.value.as_str())
    }

    /// All aliases in insertion order.
    pub fn list(&self) -> &[Alias] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of the byte lengths of all stored values.
    pub fn total_value_len(&self) -> usize {
        self.total_value_len
    }

    /// Substitute every alias occurring in a command position of `input`.
    ///
    /// Aliases are tried in table order; for each one, occurrences are
    /// handled left to right and scanning resumes after the inserted value.
    /// A value is therefore never rescanned for its own key, but it can
    /// still be matched by aliases defined later in the table.
    pub fn resolve(&self, input: &str) -> String {
        let mut buf = String::with_capacity(input.len() + self.total_value_len);
        buf.push_str(input);

        for alias in &self.entries {
            if alias.key.is_empty() {
                continue;
            }
            let mut from = 0;
            while let Some(offset) = buf[from..].find(&alias.key) {
                let at = from + offset;
                match check_occurrence(&buf, at, &alias.key) {
                    Occurrence::Valid => {
                        debug!("alias: '{}' VALID in context '{}'", alias.key, &buf[at..]);
                        buf.replace_range(at..at + alias.key.len(), &alias.value);
                        from = at + alias.value.len();
                    }
                    Occurrence::Escaped => {
                        debug!("alias: escaping '{}'", alias.key);
                        buf.remove(at - 1);
                        from = at - 1 + alias.key.len();
                    }
                    Occurrence::Invalid => {
                        debug!("alias: '{}' INVALID in context '{}'", alias.key, &buf[at..]);
                        from = at + alias.key.len();
                    }
                }
            }
        }

        if buf != input {
            debug!("alias: input resolved to: '{buf}'");
        }
        buf
    }
}

/// Decide whether the match of `key` at byte offset `at` of `context` is a
/// command position.
fn check_occurrence(context: &str, at: usize, key: &str) -> Occurrence {
    let bytes = context.as_bytes();
    if at > 0 && bytes[at - 1] == b'\\' {
        return Occurrence::Escaped;
    }
    if key.starts_with('~') {
        return Occurrence::Valid;
    }

    let after = &bytes[at + key.len()..];
    let after_ok = match after.first() {
        None => true,
        Some(b' ' | b'|' | b';' | b')') => true,
        _ => after.starts_with(b"&&"),
    };
    if !after_ok {
        return Occurrence::Invalid;
    }

    let mut start = at;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'(') {
        start -= 1;
    }
    let before = &bytes[..start];
    let before_ok = before.is_empty()
        || matches!(before.last(), Some(b'|' | b';'))
        || before.ends_with(b"&&");

    if before_ok {
        Occurrence::Valid
    } else {
        Occurrence::Invalid
    }
}
