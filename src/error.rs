/// Everything that can go wrong while splitting, joining or (de)serializing shares.
///
/// All failures are local to the call that reports them; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    #[error("no supported modulus is larger than a {bits}-bit secret")]
    NoSuitableModulus { bits: u64 },

    #[error("not enough shares to recover the secret (need {required}, got {provided})")]
    InsufficientShares { required: usize, provided: usize },

    #[error("shares do not belong together: {0}")]
    InconsistentShares(&'static str),

    /// `index` is the position, in the order given, of the first repeated x-coordinate.
    #[error("share at position {index} repeats an earlier x-coordinate")]
    DuplicateShare { index: usize },

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("malformed input: {0}")]
    MalformedInput(&'static str),

    #[error("unsupported format version {version} (latest is {latest})")]
    UnsupportedVersion { version: u32, latest: u32 },

    #[error("invalid share: {0}")]
    InvalidShare(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
