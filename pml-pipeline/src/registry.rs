use crate::error::RegistryError;
use std::collections::BTreeMap;
use tracing::trace;

/// Characters that would make a key unreadable from PML text.
const RESERVED: &[char] = &['.', ',', ';', ':', '#', '(', ')', '|'];

/// A string-keyed map that only accepts keys which can be written as PML
/// names.
///
/// Rejects empty keys, keys containing PML punctuation, whitespace or `->`,
/// and keys that are already present. Entries cannot be replaced.
///
/// `kind` names what the keys are ("device", "stage", ...) in lookup errors.
#[derive(Debug, Clone)]
pub struct VerifiedRegistry<T> {
    kind: &'static str,
    entries: BTreeMap<String, T>,
}

impl<T> Default for VerifiedRegistry<T> {
    fn default() -> Self {
        Self::named("key")
    }
}

impl<T> VerifiedRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Checks `key` without inserting anything.
    pub fn validate_key(key: &str) -> Result<(), RegistryError> {
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        let invalid = |reason: String| RegistryError::InvalidKey {
            key: key.to_string(),
            reason,
        };
        if let Some(ch) = key.chars().find(|ch| RESERVED.contains(ch)) {
            return Err(invalid(format!("reserved character '{ch}'")));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(invalid("whitespace".to_string()));
        }
        if key.contains("->") {
            return Err(invalid("'->'".to_string()));
        }
        Ok(())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Result<(), RegistryError> {
        let key = key.into();
        Self::validate_key(&key)?;
        if self.entries.contains_key(&key) {
            return Err(RegistryError::DuplicateKey(key));
        }
        trace!(kind = self.kind, %key, "registered");
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    /// Like [`get`](Self::get), with a missing key as an error.
    pub fn lookup(&self, key: &str) -> Result<&T, RegistryError> {
        self.entries
            .get(key)
            .ok_or_else(|| RegistryError::UnknownKey {
                kind: self.kind,
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}
