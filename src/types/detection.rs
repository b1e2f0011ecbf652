use std::borrow::Cow;
use std::sync::OnceLock;

use super::{Architecture, SystemType};
use crate::sniffer::AgentSniffer;

/// Placeholder for any attribute detection could not determine.
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserInfo {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
}

impl BrowserInfo {
    pub const UNKNOWN: BrowserInfo = BrowserInfo {
        name: Cow::Borrowed(UNKNOWN),
        version: Cow::Borrowed(UNKNOWN),
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    pub family: Cow<'static, str>,
    pub version: Cow<'static, str>,
    /// Linux distribution variant, when one was recognized.
    pub variant: Cow<'static, str>,
    pub architecture: Architecture,
    pub system: SystemType,
    pub limited_device: bool,
}

/// Detection accumulator and final OS triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsCandidate {
    pub name: Cow<'static, str>,
    pub version: Cow<'static, str>,
    pub system: SystemType,
}

impl OsCandidate {
    /// The "not yet detected" sentinel.
    pub const UNKNOWN: OsCandidate = OsCandidate {
        name: Cow::Borrowed(UNKNOWN),
        version: Cow::Borrowed(UNKNOWN),
        system: SystemType::Unknown,
    };

    pub fn is_unknown(&self) -> bool {
        self.system == SystemType::Unknown && self.name == UNKNOWN
    }

    pub fn has_version(&self) -> bool {
        self.version != UNKNOWN
    }
}

/// Everything detection infers from one raw User-Agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDetection {
    pub browser: BrowserInfo,
    pub os: OsInfo,
    pub crawler: bool,
}

impl AgentDetection {
    pub fn is_crawler(&self) -> bool {
        self.crawler
    }

    pub fn browser(&self) -> &BrowserInfo {
        &self.browser
    }

    pub fn os(&self) -> &OsInfo {
        &self.os
    }
}

/// One immutable raw User-Agent string with a memoized detection result.
///
/// Detection runs at most once per instance, on first access; the
/// `OnceLock` gives the single-computation guarantee when an instance is
/// shared across threads.
#[derive(Debug)]
pub struct UserAgent {
    raw: String,
    detection: OnceLock<AgentDetection>,
}

impl UserAgent {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            detection: OnceLock::new(),
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn detection(&self) -> &AgentDetection {
        self.detection
            .get_or_init(|| AgentSniffer::shared().sniff(&self.raw))
    }

    pub fn browser(&self) -> &str {
        &self.detection().browser.name
    }

    pub fn browser_version(&self) -> &str {
        &self.detection().browser.version
    }

    pub fn os(&self) -> &OsInfo {
        &self.detection().os
    }

    pub fn is_crawler(&self) -> bool {
        self.detection().crawler
    }

    pub fn is_limited_device(&self) -> bool {
        self.detection().os.limited_device
    }
}

impl Clone for UserAgent {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
            detection: self.detection.clone(),
        }
    }
}

impl PartialEq for UserAgent {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for UserAgent {}
