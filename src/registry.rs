use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// How a header's value is represented.
///
/// A closed set of known kinds plus the generic fallback; dispatch happens
/// by canonical name at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Name and value stored verbatim.
    Generic,
    /// `key[=value]` parameter list.  With `leading_type`, the first bare
    /// segment is the value's type token (`text/html`, `attachment`) rather
    /// than a boolean flag.
    Parameterized { separator: char, leading_type: bool },
    /// RFC 1123 date value.
    Date,
    /// Raw User-Agent string, analyzable on demand.
    UserAgent,
}

/// Headers whose repeated values are conventionally comma-joined on one
/// wire line rather than written as separate repeated lines.
const MULTI_VALUE_NAMES: &[&str] = &[
    "accept",
    "accept-charset",
    "accept-encoding",
    "accept-language",
    "allow",
    "cache-control",
    "connection",
    "content-encoding",
    "content-language",
    "if-match",
    "if-none-match",
    "pragma",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "vary",
    "via",
    "warning",
];

const KNOWN_KINDS: &[(&str, HeaderKind)] = &[
    (
        "content-type",
        HeaderKind::Parameterized {
            separator: ';',
            leading_type: true,
        },
    ),
    (
        "content-disposition",
        HeaderKind::Parameterized {
            separator: ';',
            leading_type: true,
        },
    ),
    (
        "cache-control",
        HeaderKind::Parameterized {
            separator: ',',
            leading_type: false,
        },
    ),
    (
        "pragma",
        HeaderKind::Parameterized {
            separator: ',',
            leading_type: false,
        },
    ),
    ("date", HeaderKind::Date),
    ("expires", HeaderKind::Date),
    ("last-modified", HeaderKind::Date),
    ("if-modified-since", HeaderKind::Date),
    ("user-agent", HeaderKind::UserAgent),
];

/// Immutable name→kind lookup table used to dispatch raw `(name, value)`
/// pairs to their representation, with `Generic` as the fallback.
///
/// Built once behind `shared()` and passed by reference; nothing here
/// depends on static initialization order.
pub struct HeaderRegistry {
    kinds: HashMap<&'static str, HeaderKind>,
    multi_value: HashSet<&'static str>,
}

impl HeaderRegistry {
    fn build() -> Self {
        Self {
            kinds: KNOWN_KINDS.iter().copied().collect(),
            multi_value: MULTI_VALUE_NAMES.iter().copied().collect(),
        }
    }

    /// The process-wide registry instance.
    pub fn shared() -> &'static HeaderRegistry {
        static REGISTRY: OnceLock<HeaderRegistry> = OnceLock::new();
        REGISTRY.get_or_init(HeaderRegistry::build)
    }

    /// Kind for `name` (case-insensitive); `Generic` when unregistered.
    pub fn kind_of(&self, name: &str) -> HeaderKind {
        self.kinds
            .get(name.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(HeaderKind::Generic)
    }

    /// Does `name` serialize repeated values comma-joined on one line?
    pub fn is_multi_value(&self, name: &str) -> bool {
        self.multi_value
            .contains(name.to_ascii_lowercase().as_str())
    }
}
