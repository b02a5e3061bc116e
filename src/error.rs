use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum RepotextError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: io::Error,
    },
    #[error("Walk error: {0}")]
    Walk(String),
}

impl RepotextError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RepotextError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Raised while building a [`Config`](crate::Config), before any traversal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("root path does not exist: {path}")]
    RootNotFound {
        path: PathBuf,
        source: io::Error,
    },
    #[error("root path is not a directory: {0}")]
    RootNotDirectory(PathBuf),
    #[error("maximum file size must be a positive number of bytes")]
    ZeroSizeLimit,
    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },
}

/// Broad class of a per-entry filesystem failure.
///
/// Only the class is rendered into documents; the OS message differs between
/// platforms and would make output unstable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessErrorKind {
    PermissionDenied,
    NotFound,
    BrokenLink,
    LinkLoop,
    /// FIFOs, sockets and devices; reading them could block or never end.
    NotRegular,
    Other,
}

impl AccessErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            AccessErrorKind::PermissionDenied => "permission denied",
            AccessErrorKind::NotFound => "not found",
            AccessErrorKind::BrokenLink => "broken link",
            AccessErrorKind::LinkLoop => "link loop",
            AccessErrorKind::NotRegular => "not a regular file",
            AccessErrorKind::Other => "I/O error",
        }
    }

    pub(crate) fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => AccessErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => AccessErrorKind::NotFound,
            _ => AccessErrorKind::Other,
        }
    }
}

/// A non-fatal failure recorded against a single node.
#[derive(Debug, Error)]
#[error("{}: {source}", .kind.label())]
pub struct AccessError {
    pub kind: AccessErrorKind,
    pub source: io::Error,
}

impl AccessError {
    pub(crate) fn new(source: io::Error) -> Self {
        Self {
            kind: AccessErrorKind::from_io(&source),
            source,
        }
    }

    pub(crate) fn with_kind(kind: AccessErrorKind, source: io::Error) -> Self {
        Self { kind, source }
    }
}
