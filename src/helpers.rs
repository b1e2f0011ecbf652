/// Trim `s` and return `None` when nothing remains.
pub fn trim_to_option(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Is `s` a plain base-10 integer (optional leading minus)?  Used by the
/// parameter formatter to decide whether a value needs quoting.
pub(crate) fn is_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Is `s` a version-shaped fragment: `digit(.digit)*`?
pub(crate) fn is_version_fragment(s: &str) -> bool {
    !s.is_empty()
        && s.split('.')
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_to_option_handles_blank() {
        assert_eq!(trim_to_option("  x  "), Some("x"));
        assert_eq!(trim_to_option("   "), None);
        assert_eq!(trim_to_option(""), None);
    }

    #[test]
    fn numeric_check() {
        assert!(is_numeric("0"));
        assert!(is_numeric("-42"));
        assert!(!is_numeric("4.2"));
        assert!(!is_numeric(""));
        assert!(!is_numeric("a1"));
    }

    #[test]
    fn version_fragments() {
        assert!(is_version_fragment("10"));
        assert!(is_version_fragment("91.0.4472.124"));
        assert!(!is_version_fragment("10_15_7"));
        assert!(!is_version_fragment("10."));
        assert!(!is_version_fragment("x64"));
    }
}
