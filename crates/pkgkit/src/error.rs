//! Error types for package, key and repository operations.
//!
//! Backend failures keep the command line and its stderr so a caller can
//! log exactly what was run.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converging system resources.
#[derive(Debug, Error)]
pub enum Error {
    /// External command exited with a non-zero status
    #[error("command failed: {command}{}", stderr_suffix(stderr))]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Standard error output from the failed command
        stderr: String,
    },

    /// External command could not be started
    #[error("failed to execute {command}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// Key listing could not be read to the end
    #[error("failed to check if listing contains key {key}")]
    Listing {
        key: String,
        #[source]
        source: io::Error,
    },

    /// Filesystem access for repository lists failed
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Repository name or source line cannot be registered
    #[error("invalid apt repository {name:?}: {reason}")]
    InvalidRepository { name: String, reason: String },

    /// Requested convergence is not supported
    #[error("not implemented: {operation}")]
    NotImplemented { operation: String },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}

impl Error {
    /// Whether the operation is explicitly unsupported rather than failed.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}

/// Result type for package, key and repository operations.
pub type Result<T> = std::result::Result<T, Error>;
