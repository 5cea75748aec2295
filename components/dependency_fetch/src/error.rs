// components/dependency_fetch/src/error.rs
//! Error types for fetching and materializing dependency archives
//!
//! Errors carry the operation and path context they happened in and keep
//! the underlying cause reachable through `source()`. The URL of the
//! failing entry lives on [`EntryFailure`], not on every variant.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("source list not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed source list {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid source list {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("request failed")]
    Network(#[source] reqwest::Error),

    #[error("server answered with HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("unsupported content encoding {}, expected gzip", .found.as_deref().unwrap_or("<none>"))]
    UnsupportedEncoding { found: Option<String> },

    #[error("failed to decompress archive stream")]
    Decompression(#[source] std::io::Error),

    #[error("refusing to write target named {0:?}")]
    InvalidTargetName(String),

    #[error("{0} exists and is not a directory")]
    NotADirectory(PathBuf),

    #[error("failed to unpack {archive}")]
    Unpack {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error during {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("background task failed")]
    Task(#[from] tokio::task::JoinError),
}

impl FetchError {
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        FetchError::Io {
            operation: operation.into(),
            source,
        }
    }

    /// True for connection, timeout and status failures
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::HttpStatus(_))
    }
}

/// Where in its lifecycle an entry was when it stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStage {
    Pending,
    Fetching,
    Decompressing,
    Writing,
    Unpacking,
}

impl fmt::Display for EntryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryStage::Pending => "pending",
            EntryStage::Fetching => "fetching",
            EntryStage::Decompressing => "decompressing",
            EntryStage::Writing => "writing",
            EntryStage::Unpacking => "unpacking",
        };
        f.write_str(name)
    }
}

/// A failed entry together with the URL and stage it failed at
#[derive(Error, Debug)]
#[error("{url}: {stage} failed: {error}")]
pub struct EntryFailure {
    pub url: String,
    pub stage: EntryStage,
    #[source]
    pub error: FetchError,
}

impl EntryFailure {
    pub fn new(url: impl Into<String>, stage: EntryStage, error: FetchError) -> Self {
        Self {
            url: url.into(),
            stage,
            error,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
