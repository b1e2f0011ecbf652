use std::time::SystemTime;

use crate::error::{Error, Result};

/// Parse an RFC 1123 date (`Tue, 15 Nov 1994 08:12:31 GMT`).
///
/// The two obsolete formats HTTP still requires receivers to accept
/// (RFC 850 and asctime) are handled by `httpdate` as well.
pub fn parse_rfc1123(s: &str) -> Result<SystemTime> {
    httpdate::parse_http_date(s.trim()).map_err(|_| Error::DateFormat(s.to_owned()))
}

/// Format a timestamp as RFC 1123, always in GMT.
pub fn format_rfc1123(t: SystemTime) -> String {
    httpdate::fmt_http_date(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn round_trip() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(784_887_151);
        let text = format_rfc1123(t);
        assert_eq!(text, "Tue, 15 Nov 1994 08:12:31 GMT");
        assert_eq!(parse_rfc1123(&text).unwrap(), t);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        assert!(parse_rfc1123(" Tue, 15 Nov 1994 08:12:31 GMT ").is_ok());
    }

    #[test]
    fn garbage_is_a_date_format_error() {
        assert!(matches!(
            parse_rfc1123("yesterday"),
            Err(Error::DateFormat(_))
        ));
    }
}
