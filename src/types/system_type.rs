/// Operating-system family detected from a User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemType {
    Android,
    Bada,
    Bsd,
    FireOs,
    Ios,
    Linux,
    Mac,
    Nintendo,
    Playstation,
    RimTablet,
    Sailfish,
    TvOs,
    Windows,
    WindowsPhone,
    Xbox,
    Unknown,
}

impl SystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Bada => "bada",
            Self::Bsd => "bsd",
            Self::FireOs => "fire os",
            Self::Ios => "ios",
            Self::Linux => "linux",
            Self::Mac => "mac os",
            Self::Nintendo => "nintendo",
            Self::Playstation => "playstation",
            Self::RimTablet => "rim tablet os",
            Self::Sailfish => "sailfish",
            Self::TvOs => "tvos",
            Self::Windows => "windows",
            Self::WindowsPhone => "windows phone",
            Self::Xbox => "xbox",
            Self::Unknown => "unknown",
        }
    }
}
