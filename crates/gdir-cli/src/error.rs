//! Error types for gdir-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from gdir-fs
    #[error(transparent)]
    Fs(#[from] gdir_fs::Error),

    /// Error from gdir-store
    #[error(transparent)]
    Store(#[from] gdir_store::Error),

    /// Error from gdir-acl
    #[error(transparent)]
    Acl(#[from] gdir_acl::AclError),

    /// Error from gdir-git
    #[error(transparent)]
    Git(#[from] gdir_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
