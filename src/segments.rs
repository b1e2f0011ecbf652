use std::sync::OnceLock;

use regex::Regex;

/// One `name/version` product token of a User-Agent string, with the
/// parenthesized comment that follows it, when any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentSegment<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub comment: Option<&'a str>,
}

/// The product-token pattern: a (possibly multi-word) name, `/`, a version
/// token, and an optional parenthesized comment.
pub(crate) fn segment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?x)
            (?P<name> [A-Za-z0-9][A-Za-z0-9._+!-]* (?:\ [A-Za-z0-9][A-Za-z0-9._+!-]*)* )
            / (?P<version> [A-Za-z0-9._+-]+ )
            (?: \s* \( (?P<comment> [^)]*) \) )?
            ",
        )
        .expect("segment pattern compiles")
    })
}

/// Tokenize `ua` left to right.
///
/// The returned iterator is finite and not restartable; re-tokenize to scan
/// again.  Unmatchable input yields an empty sequence, never an error.
pub fn segments(ua: &str) -> Segments<'_> {
    Segments {
        inner: segment_pattern().captures_iter(ua),
    }
}

pub struct Segments<'a> {
    inner: regex::CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = AgentSegment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let caps = self.inner.next()?;
        Some(AgentSegment {
            name: caps.name("name").map(|m| m.as_str()).unwrap_or(""),
            version: caps.name("version").map(|m| m.as_str()).unwrap_or(""),
            comment: caps.name("comment").map(|m| m.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(ua: &str) -> Vec<AgentSegment<'_>> {
        segments(ua).collect()
    }

    #[test]
    fn tokenizes_a_desktop_chrome_string() {
        let segs = all(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        );
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0].name, "Mozilla");
        assert_eq!(segs[0].version, "5.0");
        assert_eq!(segs[0].comment, Some("Windows NT 10.0; Win64; x64"));
        assert_eq!(segs[1].comment, Some("KHTML, like Gecko"));
        assert_eq!(segs[2].name, "Chrome");
        assert_eq!(segs[2].version, "91.0.4472.124");
        assert_eq!(segs[3].comment, None);
    }

    #[test]
    fn multi_word_names_are_kept_together() {
        let segs = all("Version/4.0 Mobile Safari/534.30");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].name, "Version");
        assert_eq!(segs[1].name, "Mobile Safari");
        assert_eq!(segs[1].version, "534.30");
    }

    #[test]
    fn compatible_comment_is_attached_to_the_first_segment() {
        let segs = all("Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)");
        assert_eq!(segs.len(), 1);
        assert_eq!(
            segs[0].comment,
            Some("compatible; Googlebot/2.1; +http://www.google.com/bot.html")
        );
    }

    #[test]
    fn garbage_yields_an_empty_sequence() {
        assert!(all("").is_empty());
        assert!(all("no product tokens here").is_empty());
    }
}
