use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::date;
use crate::error::{Error, Result};
use crate::helpers::is_numeric;

/// One typed parameter value.
///
/// Values arrive as text; the parser keeps quoted text as `Str`, infers
/// `Int` from unquoted numeric text, and stores bare tokens as `Flag(true)`.
/// `Date` values are only produced programmatically (`set`) and serialize
/// as quoted RFC 1123 text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Flag(bool),
    Date(SystemTime),
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<SystemTime> for ParamValue {
    fn from(v: SystemTime) -> Self {
        Self::Date(v)
    }
}

/// An ordered set of `key[=value]` parameters.
///
/// Keys are lower-cased; a later `set` of the same key overwrites the
/// earlier one.  Iteration (and therefore serialization) is in sorted key
/// order, so formatting is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `;`- or `,`-separated parameter list.
    ///
    /// Each segment is trimmed.  A segment without `=` is offered to
    /// `on_bare`; when that returns a key, the key is stored as a boolean
    /// flag (callers use this to pull out a leading type token, or to turn
    /// directives like `no-cache` into flags).  A segment with `=` is split
    /// at the first occurrence; a value wrapped in one matching `"` or `'`
    /// pair is unquoted and kept as text, an unquoted value is kept as an
    /// integer when it parses as one.
    pub fn parse(
        raw: &str,
        separator: char,
        mut on_bare: impl FnMut(&str) -> Option<String>,
    ) -> Self {
        let mut params = Self::new();
        for segment in raw.split(separator) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            match segment.find('=') {
                None => {
                    if let Some(key) = on_bare(segment) {
                        params.set(key, true);
                    }
                }
                Some(idx) => {
                    let key = segment[..idx].trim();
                    let value = segment[idx + 1..].trim();
                    if key.is_empty() {
                        continue;
                    }
                    match unquote(value) {
                        Some(inner) => params.set(key, inner),
                        None => match value.parse::<i64>() {
                            Ok(n) => params.set(key, n),
                            Err(_) => params.set(key, value),
                        },
                    }
                }
            }
        }
        params
    }

    /// Store `value` under the lower-cased `key`, replacing any earlier value.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<ParamValue>) {
        self.entries
            .insert(key.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.entries.remove(&key.to_ascii_lowercase())
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.get(&key.to_ascii_lowercase())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parameters in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Best-effort typed accessors.  Absence and coercion failure both
    // yield `None`; parameter values are frequently loose in the wild.

    pub fn str_value(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn int_value(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ParamValue::Int(n) => Some(*n),
            ParamValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn date_value(&self, key: &str) -> Option<SystemTime> {
        match self.get(key)? {
            ParamValue::Date(t) => Some(*t),
            ParamValue::Str(s) => date::parse_rfc1123(s).ok(),
            _ => None,
        }
    }

    /// Strict variant of `int_value`: a present value that does not
    /// coerce to an integer is a `NumberFormat` error instead of `None`.
    pub fn require_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Int(n)) => Ok(Some(*n)),
            Some(ParamValue::Str(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| Error::NumberFormat(s.clone())),
            Some(_) => Err(Error::NumberFormat(key.to_owned())),
        }
    }

    /// True for an explicit `Flag(true)` and for any non-flag value —
    /// presence implies truthy.
    pub fn flag_value(&self, key: &str) -> bool {
        match self.get(key) {
            Some(ParamValue::Flag(b)) => *b,
            Some(_) => true,
            None => false,
        }
    }

    /// Serialize in sorted key order.  `Flag(false)` entries are omitted,
    /// `Flag(true)` is the bare key, and non-numeric text is quoted.
    pub fn format(&self, separator: char) -> String {
        let mut out = String::new();
        self.write(separator, &mut out);
        out
    }

    pub(crate) fn write(&self, separator: char, out: &mut String) {
        let mut first = true;
        for (key, value) in self.iter() {
            if matches!(value, ParamValue::Flag(false)) {
                continue;
            }
            if !first {
                out.push(separator);
                out.push(' ');
            }
            first = false;
            out.push_str(key);
            match value {
                ParamValue::Flag(_) => {}
                ParamValue::Int(n) => {
                    out.push('=');
                    out.push_str(&n.to_string());
                }
                ParamValue::Date(t) => {
                    out.push_str("=\"");
                    out.push_str(&date::format_rfc1123(*t));
                    out.push('"');
                }
                ParamValue::Str(s) => {
                    out.push('=');
                    if is_numeric(s) {
                        out.push_str(s);
                    } else {
                        out.push('"');
                        out.push_str(s);
                        out.push('"');
                    }
                }
            }
        }
    }
}

/// Strip one matching `"` or `'` pair, or `None` when the value is unquoted.
fn unquote(value: &str) -> Option<&str> {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return Some(&value[1..value.len() - 1]);
        }
    }
    None
}
