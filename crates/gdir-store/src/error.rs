//! Error types for gdir-store

/// Result type for gdir-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in gdir-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record exists at the derived path
    #[error("{kind} '{name}' not found")]
    NotFound { kind: String, name: String },

    /// Tag verification failed: wrong secret, wrong kind, or corrupted bytes
    #[error("Cannot authenticate {kind} record (wrong secret, wrong kind, or corrupted data)")]
    AuthenticationFailure { kind: String },

    #[error("Encryption failed: {message}")]
    Encryption { message: String },

    /// The secret value is unusable
    #[error("Invalid secret: {message}")]
    InvalidSecret { message: String },

    #[error("Invalid access control on user '{name}': {source}")]
    InvalidAccess {
        name: String,
        #[source]
        source: gdir_acl::AclError,
    },

    #[error(transparent)]
    Fs(#[from] gdir_fs::Error),

    #[error("Malformed {kind} document: {source}")]
    Json {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::AuthenticationFailure { .. })
    }
}
