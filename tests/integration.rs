use header_detector::{AgentSniffer, Error, HeaderCollection, HeaderField};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// User-Agent fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct UaFixture {
    user_agent: String,
    #[serde(default)]
    browser: Option<BrowserFixture>,
    #[serde(default)]
    os: Option<OsFixture>,
    #[serde(default)]
    crawler: Option<bool>,
    #[serde(default)]
    limited_device: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct BrowserFixture {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsFixture {
    #[serde(default)]
    family: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    architecture: Option<String>,
    #[serde(default)]
    variant: Option<String>,
}

#[test]
fn user_agent_fixtures() {
    let content = std::fs::read_to_string("tests/fixtures/user_agents.yml").unwrap();
    let fixtures: Vec<UaFixture> = serde_yaml::from_str(&content).unwrap();
    assert!(!fixtures.is_empty());

    let sniffer = AgentSniffer::shared();
    for f in &fixtures {
        let d = sniffer.sniff(&f.user_agent);

        if let Some(browser) = &f.browser {
            if let Some(name) = &browser.name {
                assert_eq!(
                    d.browser.name.as_ref(),
                    name,
                    "browser name for UA: {}",
                    f.user_agent
                );
            }
            if let Some(version) = &browser.version {
                assert_eq!(
                    d.browser.version.as_ref(),
                    version,
                    "browser version for UA: {}",
                    f.user_agent
                );
            }
        }

        if let Some(os) = &f.os {
            if let Some(family) = &os.family {
                assert_eq!(d.os.family.as_ref(), family, "os family for UA: {}", f.user_agent);
            }
            if let Some(version) = &os.version {
                assert_eq!(
                    d.os.version.as_ref(),
                    version,
                    "os version for UA: {}",
                    f.user_agent
                );
            }
            if let Some(system) = &os.system {
                assert_eq!(
                    d.os.system.as_str(),
                    system,
                    "system type for UA: {}",
                    f.user_agent
                );
            }
            if let Some(architecture) = &os.architecture {
                assert_eq!(
                    d.os.architecture.as_str(),
                    architecture,
                    "architecture for UA: {}",
                    f.user_agent
                );
            }
            if let Some(variant) = &os.variant {
                assert_eq!(
                    d.os.variant.as_ref(),
                    variant,
                    "os variant for UA: {}",
                    f.user_agent
                );
            }
        }

        if let Some(crawler) = f.crawler {
            assert_eq!(d.crawler, crawler, "crawler flag for UA: {}", f.user_agent);
        }
        if let Some(limited) = f.limited_device {
            assert_eq!(
                d.os.limited_device, limited,
                "limited-device flag for UA: {}",
                f.user_agent
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Header block scenarios
// ---------------------------------------------------------------------------

#[test]
fn cache_control_scenario() {
    let headers = HeaderCollection::parse("Cache-Control: no-cache, max-age=0\r\n\r\n").unwrap();
    let field = headers.get("cache-control").unwrap();
    assert!(field.is_no_cache());
    assert_eq!(field.param_i64("max-age"), Some(0));
}

#[test]
fn content_disposition_scenario() {
    let headers =
        HeaderCollection::parse("Content-Disposition: attachment; filename=\"a.txt\"\r\n\r\n")
            .unwrap();
    let field = headers.get("Content-Disposition").unwrap();
    assert_eq!(field.type_token(), Some("attachment"));
    assert_eq!(field.filename(), Some("a.txt"));
}

#[test]
fn header_round_trip_preserves_the_primary_value() {
    for (name, value) in [
        ("Content-Type", "text/html; charset=\"utf-8\""),
        ("Cache-Control", "max-age=3600, private"),
        ("X-Custom", "opaque value"),
        ("Content-Disposition", "inline"),
    ] {
        let original = HeaderField::of(name, value);
        let mut wire = String::new();
        original.write_lines(&mut wire);
        let reparsed = HeaderCollection::parse(&wire).unwrap();
        assert_eq!(
            reparsed.get(name).unwrap(),
            &original,
            "round trip for {name}: {value}"
        );
    }
}

#[test]
fn freeze_is_permanent_and_idempotent() {
    let mut headers = HeaderCollection::parse("Cache-Control: no-cache\r\n\r\n").unwrap();
    headers.freeze();
    headers.freeze();
    assert!(matches!(headers.add("Accept", "*/*"), Err(Error::ReadOnly)));
    let field = headers.get_mut("cache-control").unwrap();
    assert!(field.is_frozen());
    assert!(matches!(field.append_value("private"), Err(Error::ReadOnly)));
    // reads still work
    assert!(headers.get("cache-control").unwrap().is_no_cache());
}

#[test]
fn appending_a_different_name_is_rejected() {
    let mut field = HeaderField::of("Content-Type", "text/html");
    let err = field.append(HeaderField::of("ETag", "\"abc\"")).unwrap_err();
    match err {
        Error::NameMismatch { expected, got } => {
            assert_eq!(expected, "Content-Type");
            assert_eq!(got, "ETag");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn values_keep_insertion_order_regardless_of_multi_value_flag() {
    // comma-joined on the wire
    let mut vary = HeaderField::of("Vary", "v1");
    vary.append_value("v2").unwrap();
    vary.append_value("v3").unwrap();
    assert_eq!(vary.values().collect::<Vec<_>>(), ["v1", "v2", "v3"]);

    // repeated lines on the wire
    let mut cookie = HeaderField::of("Set-Cookie", "v1");
    cookie.append_value("v2").unwrap();
    cookie.append_value("v3").unwrap();
    assert_eq!(cookie.values().collect::<Vec<_>>(), ["v1", "v2", "v3"]);
}

#[test]
fn date_headers_parse_strictly_and_leniently() {
    let headers = HeaderCollection::parse(
        "Date: Tue, 15 Nov 1994 08:12:31 GMT\r\nExpires: soon\r\n\r\n",
    )
    .unwrap();
    assert!(headers.get("date").unwrap().date_value().is_some());
    assert!(headers.get("expires").unwrap().date_value().is_none());
    assert!(matches!(
        headers.get("expires").unwrap().parse_date(),
        Err(Error::DateFormat(_))
    ));
}

#[test]
fn collection_exposes_a_memoized_user_agent() {
    let headers = HeaderCollection::parse(
        "User-Agent: Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)\r\n\r\n",
    )
    .unwrap();
    let ua = headers.user_agent().unwrap();
    assert!(ua.is_crawler());
    assert_eq!(ua.browser(), "Googlebot");
    assert_eq!(ua.browser_version(), "2.1");
    // detection is computed once and cached on the instance
    assert!(std::ptr::eq(ua.detection(), ua.detection()));
}

#[test]
fn full_block_parses_and_serializes_in_order() {
    let block = "Host: example.com\r\n\
                 User-Agent: curl/7.88.1\r\n\
                 Accept: text/html\r\n\
                 Accept: application/json\r\n\
                 \r\n";
    let headers = HeaderCollection::parse(block).unwrap();
    assert_eq!(headers.len(), 3);
    assert_eq!(
        headers.write(),
        "Host: example.com\r\n\
         User-Agent: curl/7.88.1\r\n\
         Accept: text/html, application/json\r\n\
         \r\n"
    );
}
