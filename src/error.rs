use std::fmt;

/// Crate-wide error taxonomy for the spelling subsystem.
///
/// Mirrors the failure modes a caller needs to branch on (invalid input,
/// an exhausted prefix-group id space, corrupt on-disk data, I/O failure,
/// or a reader outliving its revision). Kept as a plain enum with a
/// hand-written `Display` rather than a derive-macro error type.
#[derive(Debug)]
pub enum SpellingError {
    /// Empty key/term where forbidden, a word too long to encode, etc.
    InvalidArgument(String),
    /// Prefix-group id space exhausted (next id would hit PREFIX_DISABLED).
    RangeError(String),
    /// Malformed varint or truncated value read back from the backing store.
    DatabaseCorrupt(String),
    /// Backing-store read/write failure.
    Io(String),
    /// A long-running reader found its revision gone.
    ModifiedDuringRead,
}

impl fmt::Display for SpellingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellingError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            SpellingError::RangeError(msg) => write!(f, "range error: {}", msg),
            SpellingError::DatabaseCorrupt(msg) => write!(f, "database corrupt: {}", msg),
            SpellingError::Io(msg) => write!(f, "io error: {}", msg),
            SpellingError::ModifiedDuringRead => {
                write!(f, "revision no longer available, reopen the reader")
            }
        }
    }
}

impl std::error::Error for SpellingError {}

impl From<std::io::Error> for SpellingError {
    fn from(e: std::io::Error) -> Self {
        SpellingError::Io(e.to_string())
    }
}
