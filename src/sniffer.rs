use std::borrow::Cow;
use std::sync::OnceLock;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use regex::Regex;

use crate::error::Result;
use crate::helpers::is_version_fragment;
use crate::segments::{segment_pattern, segments, AgentSegment};
use crate::types::{
    AgentDetection, Architecture, BrowserInfo, OsCandidate, OsInfo, SystemType, UNKNOWN,
};

// ---------------------------------------------------------------------------
// Fixed tables
// ---------------------------------------------------------------------------

/// Ordered OS keyword table; the first substring match within a comment
/// token wins, so multi-word phrases come before their prefixes
/// ("windows phone" before "windows").  A `Some` display name overrides the
/// name otherwise rebuilt from the token's fragments (alias entries).
const OS_KEYWORDS: &[(&str, Option<&str>, SystemType)] = &[
    ("windows phone", None, SystemType::WindowsPhone),
    ("xbox", None, SystemType::Xbox),
    ("android", None, SystemType::Android),
    ("iphone os", Some("iOS"), SystemType::Ios),
    ("tvos", None, SystemType::TvOs),
    ("ios", None, SystemType::Ios),
    ("mac os", None, SystemType::Mac),
    ("windows", None, SystemType::Windows),
    ("linux", None, SystemType::Linux),
    ("bsd", None, SystemType::Bsd),
    ("fire os", None, SystemType::FireOs),
    ("bada", None, SystemType::Bada),
    ("nintendo", None, SystemType::Nintendo),
    ("playstation", None, SystemType::Playstation),
    ("rim tablet os", Some("RIM Tablet OS"), SystemType::RimTablet),
    ("sailfish", None, SystemType::Sailfish),
];

/// Linux distribution markers scanned over the whole raw string when the
/// comment pass produced no OS candidate.
const LINUX_DISTROS: &[(&str, &str)] = &[
    ("ubuntu", "Ubuntu"),
    ("debian", "Debian"),
    ("fedora", "Fedora"),
    ("red hat", "Red Hat"),
    ("suse", "SUSE"),
    ("gentoo", "Gentoo"),
    ("mint", "Mint"),
    ("mandriva", "Mandriva"),
    ("slackware", "Slackware"),
    ("centos", "CentOS"),
];

/// Architecture tokens; the match must sit after start-of-string,
/// whitespace, `,`, `;` or `_`.
const ARCH_TOKENS: &[(&str, Architecture)] = &[
    ("x86_64", Architecture::X86_64),
    ("amd64", Architecture::X86_64),
    ("wow64", Architecture::X86_64),
    ("win64", Architecture::X86_64),
    ("x64", Architecture::X86_64),
    ("i386", Architecture::X86),
    ("i486", Architecture::X86),
    ("i586", Architecture::X86),
    ("i686", Architecture::X86),
    ("ppc64", Architecture::Ppc64),
    ("ppc", Architecture::Ppc),
    ("arm64", Architecture::Arm64),
    ("arm", Architecture::Arm),
    ("sparc", Architecture::Sparc),
    ("mips", Architecture::Mips),
];

/// Known automated clients.  The whitelist is deliberately fixed — a
/// substring hit anywhere in the string marks the agent as a crawler.
const CRAWLER_TOKENS: &[&str] = &[
    "googlebot",
    "bingbot",
    "yandexbot",
    "duckduckbot",
    "baiduspider",
    "slurp",
    "applebot",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "semrushbot",
    "ahrefsbot",
    "mj12bot",
    "dotbot",
    "petalbot",
    "curl",
    "wget",
    "okhttp",
    "python-requests",
    "python-urllib",
    "go-http-client",
    "apache-httpclient",
    "libwww-perl",
    "phantomjs",
    "headlesschrome",
];

/// Lower-cased segment name → canonical browser name.
const BROWSER_ALIASES: &[(&str, &str)] = &[
    ("chrome", "Chrome"),
    ("chromium", "Chromium"),
    ("conkeror", "Konqueror"),
    ("edg", "Edge"),
    ("edge", "Edge"),
    ("firefox", "Firefox"),
    ("iemobile", "Internet Explorer"),
    ("konqueror", "Konqueror"),
    ("mobile safari", "Safari"),
    ("msie", "Internet Explorer"),
    ("opera", "Opera"),
    ("opr", "Opera"),
    ("safari", "Safari"),
];

/// Segment names that never identify a browser on their own.
const BROWSER_BLACKLIST: &[&str] = &[
    "mozilla",
    "gecko",
    "khtml",
    "vendorid",
    "profile",
    "configuration",
    "version",
];

// ---------------------------------------------------------------------------
// AgentSniffer
// ---------------------------------------------------------------------------

/// Heuristic User-Agent analyzer.
///
/// Every table and pattern is compiled once at construction; `sniff()` is a
/// pure function from the raw string to an [`AgentDetection`] and never
/// fails — anything undetected resolves to the `"unknown"` sentinel.
pub struct AgentSniffer {
    /// Whole-string fallback for `(...)` groups when segment-level
    /// comments yield nothing.
    comment_re: Regex,
    /// Version-shaped token right after an `IEMobile` marker.
    ie_version_re: Regex,
    arch_ac: AhoCorasick,
    crawler_ac: AhoCorasick,
    distro_ac: AhoCorasick,
}

impl AgentSniffer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            comment_re: Regex::new(r"\(([^)]*)\)")?,
            ie_version_re: Regex::new(r"^[\s/:]*([0-9]+(?:\.[0-9]+)*)")?,
            arch_ac: AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .match_kind(MatchKind::LeftmostLongest)
                .build(ARCH_TOKENS.iter().map(|(t, _)| t))?,
            crawler_ac: AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .match_kind(MatchKind::LeftmostFirst)
                .build(CRAWLER_TOKENS)?,
            distro_ac: AhoCorasickBuilder::new()
                .ascii_case_insensitive(true)
                .match_kind(MatchKind::LeftmostFirst)
                .build(LINUX_DISTROS.iter().map(|(t, _)| t))?,
        })
    }

    /// The process-wide instance.
    pub fn shared() -> &'static AgentSniffer {
        static SNIFFER: OnceLock<AgentSniffer> = OnceLock::new();
        SNIFFER.get_or_init(|| AgentSniffer::new().expect("builtin tables compile"))
    }

    /// Analyze one raw User-Agent string.
    pub fn sniff(&self, ua: &str) -> AgentDetection {
        let segs: Vec<AgentSegment> = segments(ua).collect();
        let lower = ua.to_ascii_lowercase();

        let mut comments: Vec<&str> = segs.iter().filter_map(|s| s.comment).collect();
        if comments.is_empty() {
            comments = self
                .comment_re
                .captures_iter(ua)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .collect();
        }

        let (candidate, variant) = self.detect_os(ua, &comments);
        let architecture = self.detect_architecture(&lower);

        let (mut browser, crawler) = match self.detect_crawler(ua, &segs) {
            Some(info) => (info, true),
            None => (
                detect_browser(&segs)
                    .or_else(|| loose_compatible(&segs))
                    .unwrap_or(BrowserInfo::UNKNOWN),
                false,
            ),
        };

        // IEMobile names the actual browser on Windows Phone, whatever the
        // segments said.
        if candidate.system == SystemType::WindowsPhone {
            if let Some(pos) = lower.find("iemobile") {
                let version = self
                    .ie_version_re
                    .captures(&ua[pos + "iemobile".len()..])
                    .and_then(|c| c.get(1))
                    .map(|m| Cow::Owned(m.as_str().to_owned()))
                    .unwrap_or(Cow::Borrowed(UNKNOWN));
                browser = BrowserInfo {
                    name: Cow::Borrowed("Internet Explorer Mobile"),
                    version,
                };
            }
        }

        let limited_device = lower.contains("mobile") || browser.name == "Kindle";

        AgentDetection {
            browser,
            os: OsInfo {
                family: candidate.name,
                version: candidate.version,
                variant,
                architecture,
                system: candidate.system,
                limited_device,
            },
            crawler,
        }
    }

    // --- OS detection ---

    fn detect_os(&self, ua: &str, comments: &[&str]) -> (OsCandidate, Cow<'static, str>) {
        let mut candidate = OsCandidate::UNKNOWN;
        for comment in comments {
            let tokens: Vec<&str> = comment.split(';').map(str::trim).collect();
            // Console strings bury the interesting token mid-comment.
            let start = tokens
                .iter()
                .position(|t| t.to_ascii_lowercase().starts_with("xbox"))
                .unwrap_or(0);
            for token in &tokens[start..] {
                let token = strip_like_suffix(token);
                if token.is_empty() {
                    continue;
                }
                match match_os_token(token) {
                    Some(next) => merge_candidate(&mut candidate, next),
                    None => {
                        // A bare token can still carry the version the
                        // keyword token lacked.
                        if !candidate.is_unknown() && !candidate.has_version() {
                            let frags: Vec<&str> = token.split_whitespace().collect();
                            if let Some((_, v)) = find_version_in(&frags) {
                                candidate.version = Cow::Owned(v.to_owned());
                            }
                        }
                    }
                }
            }
        }

        if candidate.is_unknown() {
            if let Some(m) = self.distro_ac.find(ua) {
                let variant = LINUX_DISTROS[m.pattern().as_usize()].1;
                return (
                    OsCandidate {
                        name: Cow::Owned(format!("{variant} Linux")),
                        version: Cow::Borrowed(UNKNOWN),
                        system: SystemType::Linux,
                    },
                    Cow::Borrowed(variant),
                );
            }
        }

        (candidate, Cow::Borrowed(UNKNOWN))
    }

    // --- architecture detection ---

    fn detect_architecture(&self, lower: &str) -> Architecture {
        for m in self.arch_ac.find_iter(lower) {
            let boundary_ok = m.start() == 0
                || matches!(
                    lower[..m.start()].chars().next_back(),
                    Some(c) if c.is_whitespace() || matches!(c, ',' | ';' | '_')
                );
            if boundary_ok {
                return ARCH_TOKENS[m.pattern().as_usize()].1;
            }
        }
        Architecture::Unknown
    }

    // --- crawler detection ---

    fn detect_crawler(&self, ua: &str, segs: &[AgentSegment]) -> Option<BrowserInfo> {
        if let Some(m) = self.crawler_ac.find(ua) {
            let descriptor = cut_descriptor(&ua[m.start()..]);
            return Some(refine_descriptor(descriptor).unwrap_or_else(|| BrowserInfo {
                name: Cow::Owned(descriptor.to_owned()),
                version: Cow::Borrowed(UNKNOWN),
            }));
        }
        // "(compatible; Name/version; ...)" convention; only a descriptor
        // the segment grammar accepts counts as a crawler here — the loose
        // form is left to browser detection.
        let descriptor = compatible_descriptor(segs)?;
        refine_descriptor(descriptor)
    }
}

// ---------------------------------------------------------------------------
// Detection helpers
// ---------------------------------------------------------------------------

fn strip_like_suffix(token: &str) -> &str {
    match token.to_ascii_lowercase().find(" like ") {
        Some(idx) => token[..idx].trim_end(),
        None => token,
    }
}

fn match_os_token(token: &str) -> Option<OsCandidate> {
    let lower = token.to_ascii_lowercase();

    if lower.starts_with("winnt") {
        let rest = token["winnt".len()..].trim();
        let version = if is_version_fragment(rest) {
            Some(rest.to_owned())
        } else {
            let frags: Vec<&str> = rest.split_whitespace().collect();
            find_version_in(&frags).map(|(_, v)| v.to_owned())
        };
        return Some(OsCandidate {
            name: Cow::Borrowed("Windows NT"),
            version: version.map(Cow::Owned).unwrap_or(Cow::Borrowed(UNKNOWN)),
            system: SystemType::Windows,
        });
    }

    for &(keyword, canonical, system) in OS_KEYWORDS {
        if let Some(pos) = lower.find(keyword) {
            return Some(os_candidate(token, pos, canonical, system));
        }
    }
    None
}

/// Build a candidate from the fragment containing the keyword match
/// onwards: the fragments before the detected version fragment (skipping
/// architecture tokens) become the name.
fn os_candidate(
    token: &str,
    match_start: usize,
    canonical: Option<&'static str>,
    system: SystemType,
) -> OsCandidate {
    let frag_start = token[..match_start]
        .rfind(char::is_whitespace)
        .map(|i| i + 1)
        .unwrap_or(0);
    let frags: Vec<&str> = token[frag_start..].split_whitespace().collect();

    let found = find_version_in(&frags);
    let name_end = found.map(|(idx, _)| idx).unwrap_or(frags.len());
    let name: String = frags[..name_end]
        .iter()
        .filter(|f| !is_architecture_fragment(f))
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    OsCandidate {
        name: match canonical {
            Some(display) => Cow::Borrowed(display),
            None if name.is_empty() => Cow::Borrowed(UNKNOWN),
            None => Cow::Owned(name),
        },
        version: found
            .map(|(_, v)| Cow::Owned(v.to_owned()))
            .unwrap_or(Cow::Borrowed(UNKNOWN)),
        system,
    }
}

/// Locate the version among whitespace fragments: the first fragment
/// matching `digit(.digit)*`.  A short (≤ 2 chars) numeric fragment
/// followed by a longer numeric fragment yields the longer one — version
/// numbers split by a stray space.  Returns (cutoff index, version text).
fn find_version_in<'a>(frags: &[&'a str]) -> Option<(usize, &'a str)> {
    let idx = frags.iter().position(|f| is_version_fragment(f))?;
    if frags[idx].len() <= 2 {
        if let Some(next) = frags.get(idx + 1) {
            if is_version_fragment(next) && next.len() > frags[idx].len() {
                return Some((idx, next));
            }
        }
    }
    Some((idx, frags[idx]))
}

fn is_architecture_fragment(frag: &str) -> bool {
    let lower = frag.to_ascii_lowercase();
    let trimmed = lower.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_');
    ARCH_TOKENS.iter().any(|(t, _)| *t == trimmed)
}

/// First match wins, with two exceptions: Android supersedes an earlier
/// Linux candidate, and a later same-family candidate fills in a version
/// the earlier one lacked.  Preserved exactly — the order is observable on
/// real-world strings.
fn merge_candidate(current: &mut OsCandidate, next: OsCandidate) {
    if current.is_unknown() {
        *current = next;
    } else if next.system == SystemType::Android && current.system == SystemType::Linux {
        *current = next;
    } else if next.system == current.system && !current.has_version() && next.has_version() {
        current.version = next.version;
    }
}

fn cut_descriptor(rest: &str) -> &str {
    let end = rest.find(['(', ')', ';']).unwrap_or(rest.len());
    rest[..end].trim()
}

fn compatible_descriptor<'a>(segs: &[AgentSegment<'a>]) -> Option<&'a str> {
    let first = segs.first()?;
    if !first.name.eq_ignore_ascii_case("mozilla") {
        return None;
    }
    let comment = first.comment?.trim_start();
    let marker = comment.get(.."compatible;".len())?;
    if !marker.eq_ignore_ascii_case("compatible;") {
        return None;
    }
    crate::helpers::trim_to_option(cut_descriptor(&comment["compatible;".len()..]))
}

fn refine_descriptor(descriptor: &str) -> Option<BrowserInfo> {
    let caps = segment_pattern().captures(descriptor)?;
    Some(BrowserInfo {
        name: Cow::Owned(caps.name("name")?.as_str().to_owned()),
        version: Cow::Owned(caps.name("version")?.as_str().to_owned()),
    })
}

fn browser_alias(lower: &str) -> Option<&'static str> {
    BROWSER_ALIASES
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, name)| *name)
}

fn detect_browser(segs: &[AgentSegment]) -> Option<BrowserInfo> {
    // Alias pass, last segment first: the most specific product trails.
    for (idx, seg) in segs.iter().enumerate().rev() {
        let lower = seg.name.to_ascii_lowercase();
        if let Some(alias) = browser_alias(&lower) {
            // Desktop Chrome advertises a trailing Safari token.
            if alias == "Safari" && idx > 0 && segs[idx - 1].name.eq_ignore_ascii_case("chrome") {
                return Some(BrowserInfo {
                    name: Cow::Borrowed("Chrome"),
                    version: Cow::Owned(segs[idx - 1].version.to_owned()),
                });
            }
            return Some(BrowserInfo {
                name: Cow::Borrowed(alias),
                version: Cow::Owned(seg.version.to_owned()),
            });
        }
    }
    // Generic pass: the first product that is not engine noise.
    segs.iter()
        .find(|s| !BROWSER_BLACKLIST.contains(&s.name.to_ascii_lowercase().as_str()))
        .map(|s| BrowserInfo {
            name: Cow::Owned(s.name.to_owned()),
            version: Cow::Owned(s.version.to_owned()),
        })
}

/// Last resort: accept a `compatible;` descriptor the segment grammar
/// rejected, mapping its first word through the alias table ("MSIE 8.0" →
/// Internet Explorer 8.0).  Does not claim crawler status.
fn loose_compatible(segs: &[AgentSegment]) -> Option<BrowserInfo> {
    let descriptor = compatible_descriptor(segs)?;
    let frags: Vec<&str> = descriptor.split_whitespace().collect();
    let first = frags.first()?;
    let name = match browser_alias(&first.to_ascii_lowercase()) {
        Some(alias) => Cow::Borrowed(alias),
        None => Cow::Owned(descriptor.to_owned()),
    };
    let version = find_version_in(&frags)
        .map(|(_, v)| Cow::Owned(v.to_owned()))
        .unwrap_or(Cow::Borrowed(UNKNOWN));
    Some(BrowserInfo { name, version })
}
