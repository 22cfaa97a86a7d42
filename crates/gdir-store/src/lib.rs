//! Encrypted record store for gdir
//!
//! Records are AES-256-GCM sealed with the record kind as associated data
//! and laid out as `nonce ‖ ciphertext ‖ tag`. Users live under
//! `users/<sha256(secret ‖ name)>`, service accounts under `accounts/<n>`.
//!
//! One store directory must be used with exactly one secret for its whole
//! lifetime: paths are unsalted, so the same secret and name always map to
//! the same file.

pub mod accounts;
pub mod crypto;
pub mod error;
pub mod store;
pub mod user;

pub use crypto::{RecordKind, SecretKey, decrypt, derive_path, encrypt};
pub use error::{Error, Result};
pub use store::{RecordStore, StoredUser};
pub use user::User;
