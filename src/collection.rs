use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::field::HeaderField;
use crate::types::UserAgent;

/// An ordered set of header chains keyed by canonical (lower-case) name.
///
/// Mutable until `freeze()`, then permanently read-only together with every
/// field it holds.  Insertion order is preserved for serialization.
#[derive(Debug, Clone, Default)]
pub struct HeaderCollection {
    fields: IndexMap<String, HeaderField>,
    frozen: bool,
}

impl HeaderCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a header block: lines of `Name: value`, consumed until an
    /// empty line (or the end of input).  Trailing `\r` is tolerated.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_lines(text.lines())
    }

    /// Parse from an explicit line source.  Every line must contain a
    /// colon at an index greater than 1.
    pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut collection = Self::new();
        for line in lines {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }
            let idx = line
                .find(':')
                .filter(|&i| i > 1)
                .ok_or_else(|| Error::Parse(line.to_owned()))?;
            let name = line[..idx].trim();
            let value = line[idx + 1..].trim();
            collection.add(name, value)?;
        }
        Ok(collection)
    }

    /// Programmatic construction from `(name, value)` pairs; repeated
    /// names chain in iteration order.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Self> {
        let mut collection = Self::new();
        for (name, value) in pairs {
            collection.add(name, value)?;
        }
        Ok(collection)
    }

    /// Dispatch `(name, value)` through the registry and insert it,
    /// appending to an existing chain on a repeated name.
    pub fn add(&mut self, name: &str, value: &str) -> Result<()> {
        self.insert(HeaderField::of(name, value))
    }

    /// Insert every value of a multi-valued mapping entry, in order.
    pub fn add_all<'a>(
        &mut self,
        name: &str,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        for value in values {
            self.add(name, value)?;
        }
        Ok(())
    }

    /// Insert a pre-built field, appending to an existing chain of the
    /// same canonical name.
    pub fn insert(&mut self, field: HeaderField) -> Result<()> {
        self.ensure_unfrozen()?;
        let key = field.name().to_ascii_lowercase();
        match self.fields.get_mut(&key) {
            Some(existing) => existing.append(field),
            None => {
                self.fields.insert(key, field);
                Ok(())
            }
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&HeaderField> {
        self.fields.get(&name.to_ascii_lowercase())
    }

    /// Mutable lookup; a frozen collection's fields still reject mutation
    /// themselves.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut HeaderField> {
        self.fields.get_mut(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a chain, preserving the order of the remaining fields.
    pub fn remove(&mut self, name: &str) -> Result<Option<HeaderField>> {
        self.ensure_unfrozen()?;
        Ok(self.fields.shift_remove(&name.to_ascii_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &HeaderField> {
        self.fields.values()
    }

    /// The analyzer view of a `User-Agent` header, when present.
    pub fn user_agent(&self) -> Option<UserAgent> {
        self.get("user-agent").and_then(HeaderField::user_agent)
    }

    /// Permanently mark this collection and every field it holds
    /// read-only.  Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
        for field in self.fields.values_mut() {
            field.freeze();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn ensure_unfrozen(&self) -> Result<()> {
        if self.frozen {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }

    /// Serialize every field in insertion order, CRLF-terminated, followed
    /// by the empty-line terminator.
    pub fn write(&self) -> String {
        let mut out = String::new();
        for field in self.fields.values() {
            field.write_lines(&mut out);
        }
        out.push_str("\r\n");
        out
    }
}

impl fmt::Display for HeaderCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.write())
    }
}
