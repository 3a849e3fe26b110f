use std::fmt;

/// Failures the compilation core can produce.
///
/// Every variant corresponds to one of the fatal conditions in the
/// compilation pipeline: there is no partial success, and no recovery
/// once one of these is returned.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// A `]` was seen with no open `[` (byte offset into the source).
    UnmatchedClose(usize),
    /// Source ended with unclosed `[` (byte offset == source length).
    UnmatchedOpen(usize),
    /// More than 100 nested loops were open at once during code generation.
    TooManyLoops,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedClose(offset) => write!(f, "error:{offset}: unmatched ']'"),
            Self::UnmatchedOpen(offset) => write!(f, "error:{offset}: unmatched '['"),
            Self::TooManyLoops => write!(f, "error: too many nested loops"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
