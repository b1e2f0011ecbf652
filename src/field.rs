use std::fmt;
use std::time::SystemTime;

use crate::date;
use crate::error::{Error, Result};
use crate::params::{ParamValue, Parameters};
use crate::registry::{HeaderKind, HeaderRegistry};
use crate::types::UserAgent;

/// One parsed value link of a header chain.
#[derive(Debug, Clone)]
struct FieldValue {
    raw: String,
    type_token: Option<String>,
    params: Parameters,
}

impl FieldValue {
    fn parse(kind: HeaderKind, raw: &str) -> Self {
        match kind {
            HeaderKind::Parameterized {
                separator,
                leading_type,
            } => {
                let mut type_token: Option<String> = None;
                let params = Parameters::parse(raw, separator, |bare| {
                    if leading_type && type_token.is_none() {
                        type_token = Some(bare.to_owned());
                        None
                    } else {
                        Some(bare.to_ascii_lowercase())
                    }
                });
                Self {
                    raw: raw.to_owned(),
                    type_token,
                    params,
                }
            }
            _ => Self {
                raw: raw.to_owned(),
                type_token: None,
                params: Parameters::new(),
            },
        }
    }

    fn write(&self, kind: HeaderKind, out: &mut String) {
        match kind {
            HeaderKind::Parameterized { separator, .. } => {
                if let Some(token) = &self.type_token {
                    out.push_str(token);
                    if !self.params.is_empty() {
                        out.push(separator);
                        out.push(' ');
                    }
                }
                self.params.write(separator, out);
            }
            _ => out.push_str(&self.raw),
        }
    }

    fn semantic_eq(&self, other: &Self, kind: HeaderKind) -> bool {
        match kind {
            HeaderKind::Parameterized { .. } => {
                let tokens_match = match (&self.type_token, &other.type_token) {
                    (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                    (None, None) => true,
                    _ => false,
                };
                tokens_match && self.params == other.params
            }
            _ => self.raw == other.raw,
        }
    }
}

/// One named header value plus the ordered chain of repeated values of the
/// same canonical name.
///
/// The chain is an owned, growable sequence (head at index 0) rather than a
/// pointer-chased linked structure; "next" semantics are index-based.  The
/// name keeps the casing it was first constructed with; all comparisons are
/// ASCII case-insensitive.
#[derive(Debug, Clone)]
pub struct HeaderField {
    name: String,
    kind: HeaderKind,
    multi_value: bool,
    frozen: bool,
    values: Vec<FieldValue>,
}

impl HeaderField {
    /// Build a field for `(name, value)`, dispatching through the shared
    /// registry; unregistered names get the generic representation.
    pub fn of(name: impl Into<String>, value: &str) -> Self {
        Self::of_with(HeaderRegistry::shared(), name, value)
    }

    /// Like `of`, against an explicit registry.
    pub fn of_with(registry: &HeaderRegistry, name: impl Into<String>, value: &str) -> Self {
        let name = name.into();
        let kind = registry.kind_of(&name);
        let multi_value = registry.is_multi_value(&name);
        Self {
            kind,
            multi_value,
            frozen: false,
            values: vec![FieldValue::parse(kind, value)],
            name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    /// Does this header comma-join repeated values on one wire line?
    pub fn is_multi_value(&self) -> bool {
        self.multi_value
    }

    /// The primary (first) value, as parsed.
    pub fn value(&self) -> &str {
        &self.values[0].raw
    }

    /// Every chain link's value, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.raw.as_str())
    }

    /// Number of chained values.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Append `next`'s values to this chain.
    ///
    /// The canonical names must match; the chain keeps insertion order.
    pub fn append(&mut self, next: HeaderField) -> Result<()> {
        self.ensure_unfrozen()?;
        if !self.name.eq_ignore_ascii_case(&next.name) {
            return Err(Error::NameMismatch {
                expected: self.name.clone(),
                got: next.name,
            });
        }
        self.values.extend(next.values);
        Ok(())
    }

    /// Append one more raw value to this chain.
    pub fn append_value(&mut self, raw: &str) -> Result<()> {
        self.ensure_unfrozen()?;
        self.values.push(FieldValue::parse(self.kind, raw));
        Ok(())
    }

    // --- typed parameters ---
    //
    // Lookups walk the chain head→tail and use the first link whose
    // parameter set contains the key, so repeated headers carrying
    // different parameter subsets behave as one merged view.

    fn params_with(&self, key: &str) -> Option<&Parameters> {
        self.values
            .iter()
            .map(|v| &v.params)
            .find(|p| p.contains(key))
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params_with(key)?.str_value(key)
    }

    pub fn param_i64(&self, key: &str) -> Option<i64> {
        self.params_with(key)?.int_value(key)
    }

    pub fn param_date(&self, key: &str) -> Option<SystemTime> {
        self.params_with(key)?.date_value(key)
    }

    pub fn param_flag(&self, key: &str) -> bool {
        self.params_with(key)
            .map(|p| p.flag_value(key))
            .unwrap_or(false)
    }

    /// Set a parameter on the head value.
    pub fn set_param(&mut self, key: impl AsRef<str>, value: impl Into<ParamValue>) -> Result<()> {
        self.ensure_unfrozen()?;
        self.values[0].params.set(key, value);
        Ok(())
    }

    /// The leading type token of the head value (`text/html`, `attachment`).
    pub fn type_token(&self) -> Option<&str> {
        self.values[0].type_token.as_deref()
    }

    // --- conveniences for the common parameterized headers ---

    pub fn is_no_cache(&self) -> bool {
        self.param_flag("no-cache")
    }

    pub fn filename(&self) -> Option<&str> {
        self.param_str("filename")
    }

    pub fn charset(&self) -> Option<&str> {
        self.param_str("charset")
    }

    /// Strict RFC 1123 parse of a date-kind value.
    pub fn parse_date(&self) -> Result<SystemTime> {
        date::parse_rfc1123(self.value())
    }

    /// Best-effort date: `None` on absence or malformed text.
    pub fn date_value(&self) -> Option<SystemTime> {
        self.parse_date().ok()
    }

    /// Replace a date-kind value with the RFC 1123 rendering of `t`.
    pub fn set_date(&mut self, t: SystemTime) -> Result<()> {
        self.ensure_unfrozen()?;
        self.values[0].raw = date::format_rfc1123(t);
        Ok(())
    }

    /// A memoizing analyzer over a User-Agent value.
    pub fn user_agent(&self) -> Option<UserAgent> {
        match self.kind {
            HeaderKind::UserAgent => Some(UserAgent::new(self.value())),
            _ => None,
        }
    }

    // --- freezing ---

    /// Permanently mark this field read-only.  Idempotent.
    pub fn freeze(&mut self) {
        self.frozen = true;
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

    // --- serialization ---

    /// Write the wire form, each line terminated by CRLF: multi-value
    /// headers join all chain values with `", "` behind one `Name: `
    /// prefix, everything else gets one line per link.
    pub fn write_lines(&self, out: &mut String) {
        if self.multi_value {
            out.push_str(&self.name);
            out.push_str(": ");
            for (i, value) in self.values.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                value.write(self.kind, out);
            }
            out.push_str("\r\n");
        } else {
            for value in &self.values {
                out.push_str(&self.name);
                out.push_str(": ");
                value.write(self.kind, out);
                out.push_str("\r\n");
            }
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.write_lines(&mut out);
        f.write_str(&out)
    }
}

impl PartialEq for HeaderField {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            && self.kind == other.kind
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(&other.values)
                .all(|(a, b)| a.semantic_eq(b, self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_field_keeps_value_verbatim() {
        let field = HeaderField::of("X-Request-Id", "abc-123");
        assert_eq!(field.kind(), HeaderKind::Generic);
        assert_eq!(field.value(), "abc-123");
        assert_eq!(field.to_string(), "X-Request-Id: abc-123\r\n");
    }

    #[test]
    fn content_disposition_type_and_filename() {
        let field = HeaderField::of("Content-Disposition", "attachment; filename=\"a.txt\"");
        assert_eq!(field.type_token(), Some("attachment"));
        assert_eq!(field.filename(), Some("a.txt"));
    }

    #[test]
    fn cache_control_flags_and_numbers() {
        let field = HeaderField::of("Cache-Control", "no-cache, max-age=0");
        assert!(field.is_no_cache());
        assert_eq!(field.param_i64("max-age"), Some(0));
    }

    #[test]
    fn append_rejects_name_mismatch() {
        let mut field = HeaderField::of("Content-Type", "text/html");
        let err = field.append(HeaderField::of("ETag", "\"x\"")).unwrap_err();
        assert!(matches!(err, Error::NameMismatch { .. }));
    }

    #[test]
    fn append_is_case_insensitive_and_ordered() {
        let mut field = HeaderField::of("Vary", "Accept");
        field.append(HeaderField::of("vary", "Accept-Encoding")).unwrap();
        field.append_value("User-Agent").unwrap();
        let values: Vec<&str> = field.values().collect();
        assert_eq!(values, ["Accept", "Accept-Encoding", "User-Agent"]);
    }

    #[test]
    fn chained_parameter_lookup_falls_back() {
        let mut field = HeaderField::of("Cache-Control", "no-cache");
        field.append_value("max-age=60, private").unwrap();
        assert_eq!(field.param_i64("max-age"), Some(60));
        assert!(field.param_flag("private"));
        assert!(field.is_no_cache());
    }

    #[test]
    fn frozen_field_rejects_mutation() {
        let mut field = HeaderField::of("Cache-Control", "no-cache");
        field.freeze();
        field.freeze(); // idempotent
        assert!(matches!(field.set_param("max-age", 1i64), Err(Error::ReadOnly)));
        assert!(matches!(field.append_value("public"), Err(Error::ReadOnly)));
        assert!(field.is_no_cache());
    }

    #[test]
    fn multi_value_serialization_joins_with_comma() {
        let mut field = HeaderField::of("Connection", "keep-alive");
        field.append_value("Upgrade").unwrap();
        assert_eq!(field.to_string(), "Connection: keep-alive, Upgrade\r\n");
    }

    #[test]
    fn single_value_serialization_repeats_lines() {
        let mut field = HeaderField::of("Set-Cookie", "a=1");
        field.append_value("b=2").unwrap();
        assert_eq!(field.to_string(), "Set-Cookie: a=1\r\nSet-Cookie: b=2\r\n");
    }

    #[test]
    fn parameterized_round_trip_is_semantically_equal() {
        let original = HeaderField::of("Content-Disposition", "attachment; filename=\"a.txt\"");
        let mut out = String::new();
        original.write_lines(&mut out);
        let line = out.trim_end();
        let (name, value) = line.split_once(": ").unwrap();
        let reparsed = HeaderField::of(name, value);
        assert_eq!(original, reparsed);
    }

    #[test]
    fn set_parameter_is_case_insensitive() {
        let mut field = HeaderField::of("Cache-Control", "");
        field.set_param("MAX-AGE", 10i64).unwrap();
        assert_eq!(field.param_i64("max-age"), Some(10));
    }
}
