//! Error types for gdir-acl

/// Result type for gdir-acl operations
pub type Result<T> = std::result::Result<T, AclError>;

/// Errors that can occur while editing an access-control list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    #[error("Command '{command}' is not valid while the user is {state}")]
    InvalidTransition {
        command: &'static str,
        state: String,
    },

    #[error("Both allow-list and block-list are set ({allow} allowed, {block} blocked)")]
    ConflictingLists { allow: usize, block: usize },

    #[error("Invalid list position: '{input}'")]
    InvalidIndex { input: String },

    #[error("Access-control session already confirmed")]
    SessionClosed,
}
