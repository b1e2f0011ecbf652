/// Processor architecture advertised in a User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Arm,
    Arm64,
    Mips,
    Ppc,
    Ppc64,
    Sparc,
    X86,
    X86_64,
    Unknown,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Mips => "mips",
            Self::Ppc => "ppc",
            Self::Ppc64 => "ppc64",
            Self::Sparc => "sparc",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
            Self::Unknown => "unknown",
        }
    }
}
