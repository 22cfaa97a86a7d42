//! Error types for gdir-git

use std::path::{Path, PathBuf};

/// Result type for gdir-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reconciling or deploying a working copy
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("git {operation} failed in {path}: {source}")]
    Git {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("cannot use {path} as a working copy: {reason}")]
    Conflict { path: PathBuf, reason: String },

    #[error("push of {reference} was rejected: {message}")]
    PushRejected { reference: String, message: String },

    #[error("invalid remote URL: {message}")]
    InvalidRemoteUrl { message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Attach the failing operation and working copy to a `git2` error.
pub(crate) trait GitContext<T> {
    fn git(self, operation: &'static str, path: &Path) -> Result<T>;
}

impl<T> GitContext<T> for std::result::Result<T, git2::Error> {
    fn git(self, operation: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error::Git {
            operation,
            path: path.to_path_buf(),
            source,
        })
    }
}
