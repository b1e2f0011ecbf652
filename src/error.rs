#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Header line without a colon, or with the colon at index <= 1.
    #[error("malformed header line: {0:?}")]
    Parse(String),
    /// Appending a field whose canonical name differs from the chain's.
    #[error("cannot append {got:?} to a {expected:?} chain")]
    NameMismatch { expected: String, got: String },
    /// Mutation attempted after `freeze()`.
    #[error("object is frozen and read-only")]
    ReadOnly,
    #[error("invalid numeric value: {0:?}")]
    NumberFormat(String),
    #[error("invalid RFC 1123 date: {0:?}")]
    DateFormat(String),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error(transparent)]
    AhoCorasick(#[from] aho_corasick::BuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
