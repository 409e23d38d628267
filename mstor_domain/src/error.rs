//! Error types shared by every layer of the metadata store.

use thiserror::Error;

/// The abstract error kinds the metadata store can surface, independent of
/// any particular backing engine or transport.
#[derive(Debug, Error)]
pub enum MstorError {
    #[error("no such entry: {0}")]
    NotFound(String),

    #[error("entry already exists: {0}")]
    AlreadyExists(String),

    #[error("permission denied: {0}")]
    Permission(String),

    #[error("not a directory: {0}")]
    NotDir(String),

    #[error("is a directory: {0}")]
    IsDir(String),

    #[error("directory not empty: {0}")]
    NotEmpty(String),

    #[error("path component too long: {0}")]
    NameTooLong(String),

    #[error("on-disk record is corrupt: {0}")]
    Corruption(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("no such user or group: {0}")]
    NoSuchUser(String),

    #[error("out of memory")]
    OutOfMemory,

    #[error("unsupported operation: {0}")]
    Unsupported(String),

    #[error("malformed record key or payload: {0}")]
    MalformedRecord(String),

    #[error("incompatible on-disk version: {0}")]
    IncompatibleVersion(String),
}

impl MstorError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn already_exists(what: impl Into<String>) -> Self {
        Self::AlreadyExists(what.into())
    }

    pub fn permission(what: impl Into<String>) -> Self {
        Self::Permission(what.into())
    }

    pub fn not_dir(what: impl Into<String>) -> Self {
        Self::NotDir(what.into())
    }

    pub fn is_dir(what: impl Into<String>) -> Self {
        Self::IsDir(what.into())
    }

    pub fn not_empty(what: impl Into<String>) -> Self {
        Self::NotEmpty(what.into())
    }

    pub fn name_too_long(what: impl Into<String>) -> Self {
        Self::NameTooLong(what.into())
    }

    pub fn corruption(what: impl Into<String>) -> Self {
        Self::Corruption(what.into())
    }

    pub fn no_such_user(what: impl Into<String>) -> Self {
        Self::NoSuchUser(what.into())
    }

    pub fn unsupported(what: impl Into<String>) -> Self {
        Self::Unsupported(what.into())
    }

    pub fn malformed(what: impl Into<String>) -> Self {
        Self::MalformedRecord(what.into())
    }

    /// A short, stable tag for structured log fields and metrics, the way
    /// callers key off `PipelineError::category` rather than matching on
    /// `Display` text.
    pub fn category(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::AlreadyExists(_) => "already_exists",
            Self::Permission(_) => "permission",
            Self::NotDir(_) => "not_dir",
            Self::IsDir(_) => "is_dir",
            Self::NotEmpty(_) => "not_empty",
            Self::NameTooLong(_) => "name_too_long",
            Self::Corruption(_) => "corruption",
            Self::Io(_) => "io",
            Self::NoSuchUser(_) => "no_such_user",
            Self::OutOfMemory => "out_of_memory",
            Self::Unsupported(_) => "unsupported",
            Self::MalformedRecord(_) => "malformed_record",
            Self::IncompatibleVersion(_) => "incompatible_version",
        }
    }

    /// Whether retrying the same request without intervention could ever
    /// succeed. Used by the bootstrap layer to choose an exit code.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_) | Self::OutOfMemory)
    }
}

impl From<std::io::Error> for MstorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

pub type MstorResult<T> = Result<T, MstorError>;
