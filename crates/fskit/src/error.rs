//! Error types for filesystem reconciliation.
//!
//! Each variant names the operation that failed and the path it failed
//! on. The underlying I/O error, where there is one, is the `source`.

use crate::types::FileKind;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while probing or converging filesystem state.
#[derive(Debug, Error)]
pub enum Error {
    /// Stat failed for a reason other than "not found"
    #[error("failed to stat {}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Path exists but is neither a regular file nor a directory
    #[error("{} is neither a regular file nor a directory", path.display())]
    Special { path: PathBuf },

    /// Actual kind is incompatible with the desired kind
    #[error("{} is {actual}, expected {expected}", path.display())]
    TypeMismatch {
        path: PathBuf,
        expected: FileKind,
        actual: FileKind,
    },

    /// Copy source does not exist
    #[error("copy source {} does not exist", path.display())]
    SourceMissing { path: PathBuf },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to change mode of {} to {mode:o}", path.display())]
    Chmod {
        path: PathBuf,
        mode: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to change owner of {} to {uid}:{gid}", path.display())]
    Chown {
        path: PathBuf,
        uid: u32,
        gid: u32,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to remove {}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Template could not be rendered
    #[error("failed to render template: {message}")]
    Render { message: String },

    /// Requested convergence is not supported
    #[error("not implemented: {operation}")]
    NotImplemented { operation: String },
}

impl Error {
    /// Whether the desired state conflicts with what is on disk.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Result type for filesystem operations.
pub type Result<T> = std::result::Result<T, Error>;
