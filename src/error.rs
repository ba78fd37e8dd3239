//! Unified error type for all store operations.

/// Things that can go wrong when using the store.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Empty collection or resource name. Raised before touching the disk.
    Validation(String),
    /// The record, collection, or directory does not exist.
    NotFound(String),
    /// File system problem (mkdir, write, rename, remove, stat).
    Io(String),
    /// Failed to encode a value to bytes.
    Serialize(String),
    /// Stored bytes could not be decoded into the requested type.
    Deserialize(String),
    /// Bad configuration (root path is not a directory, etc.).
    Config(String),
}

impl Error {
    /// `true` for [`Error::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub(crate) fn io_at(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound(path.display().to_string())
        } else {
            Error::Io(format!("{}: {err}", path.display()))
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "validation error: {msg}"),
            Error::NotFound(what) => write!(f, "not found: {what}"),
            Error::Io(msg) => write!(f, "i/o error: {msg}"),
            Error::Serialize(msg) => write!(f, "serialization error: {msg}"),
            Error::Deserialize(msg) => write!(f, "deserialization error: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
