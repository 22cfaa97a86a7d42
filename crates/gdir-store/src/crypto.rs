//! Record sealing and path derivation
//!
//! - AES-256-GCM, cipher key `SHA-256(secret)`, record kind as associated data
//! - record layout `nonce (12) ‖ ciphertext ‖ tag (16)`, no header or version
//! - record paths are the hex SHA-256 of `secret ‖ name`

use std::borrow::Cow;
use std::fmt;

use aes_gcm::{
    Aes256Gcm, KeyInit, Nonce,
    aead::{Aead, AeadCore, OsRng, Payload, rand_core::RngCore},
};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::{Error, Result};

/// Nonce length for AES-GCM (12 bytes standard)
pub const NONCE_LENGTH: usize = 12;

/// Authentication tag length appended by AES-GCM
pub const TAG_LENGTH: usize = 16;

/// Random bytes in a generated secret (hex encoded, so 128 characters)
pub const GENERATED_SECRET_BYTES: usize = 64;

/// The operator's master secret.
///
/// Opaque to this crate: whatever bytes the caller supplies are hashed into
/// the cipher key and prefixed to names for path derivation. Zeroed on drop.
#[derive(Clone)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Error::InvalidSecret {
                message: "secret is empty".into(),
            });
        }
        Ok(Self { bytes })
    }

    /// Generate a fresh secret from the OS random source.
    ///
    /// Returns the secret together with its printable form, which is what
    /// the operator stores in the configuration file.
    pub fn generate() -> (Self, String) {
        let mut raw = [0u8; GENERATED_SECRET_BYTES];
        OsRng.fill_bytes(&mut raw);
        let encoded = hex::encode(raw);
        raw.zeroize();
        let key = Self {
            bytes: encoded.as_bytes().to_vec(),
        };
        (key, encoded)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn cipher(&self) -> Aes256Gcm {
        let key = Sha256::digest(&self.bytes);
        Aes256Gcm::new(&key)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Label binding a record to its use. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKind(Cow<'static, str>);

impl RecordKind {
    pub const USER: RecordKind = RecordKind(Cow::Borrowed("user"));
    pub const ACCOUNT: RecordKind = RecordKind(Cow::Borrowed("account"));

    pub fn new(label: impl Into<String>) -> Self {
        Self(Cow::Owned(label.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Seal `plaintext` as a record of `kind`.
///
/// Every call draws a fresh random nonce, so sealing the same plaintext
/// twice yields different records.
pub fn encrypt(secret: &SecretKey, kind: &RecordKind, plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let payload = Payload {
        msg: plaintext,
        aad: kind.as_str().as_bytes(),
    };

    let sealed = secret
        .cipher()
        .encrypt(&nonce, payload)
        .map_err(|e| Error::Encryption {
            message: e.to_string(),
        })?;

    let mut record = Vec::with_capacity(NONCE_LENGTH + sealed.len());
    record.extend_from_slice(&nonce);
    record.extend_from_slice(&sealed);
    Ok(record)
}

/// Open a record of `kind`.
///
/// Fails with [`Error::AuthenticationFailure`] unless the tag verifies
/// against both `secret` and `kind`; no plaintext is returned in that case.
pub fn decrypt(secret: &SecretKey, kind: &RecordKind, record: &[u8]) -> Result<Vec<u8>> {
    let auth_failure = || Error::AuthenticationFailure {
        kind: kind.to_string(),
    };

    if record.len() < NONCE_LENGTH + TAG_LENGTH {
        return Err(auth_failure());
    }

    let (nonce, sealed) = record.split_at(NONCE_LENGTH);
    let payload = Payload {
        msg: sealed,
        aad: kind.as_str().as_bytes(),
    };

    secret
        .cipher()
        .decrypt(Nonce::from_slice(nonce), payload)
        .map_err(|_| auth_failure())
}

/// File name for the record called `name` under `secret`.
///
/// Lowercase hex SHA-256 of `secret ‖ name`, always 64 characters.
pub fn derive_path(secret: &SecretKey, name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> SecretKey {
        SecretKey::new(value).unwrap()
    }

    #[test]
    fn record_layout_is_nonce_ciphertext_tag() {
        let record = encrypt(&secret("k"), &RecordKind::USER, b"hello").unwrap();
        assert_eq!(record.len(), NONCE_LENGTH + 5 + TAG_LENGTH);
    }

    #[test]
    fn fresh_nonce_per_call() {
        let key = secret("k");
        let a = encrypt(&key, &RecordKind::USER, b"same").unwrap();
        let b = encrypt(&key, &RecordKind::USER, b"same").unwrap();
        assert_ne!(a[..NONCE_LENGTH], b[..NONCE_LENGTH]);
    }

    #[test]
    fn truncated_record_fails_authentication() {
        let err = decrypt(&secret("k"), &RecordKind::USER, &[0u8; 20]).unwrap_err();
        assert!(err.is_authentication_failure());
    }

    #[test]
    fn derive_path_known_value() {
        // sha256("secretalice")
        let expected = format!("{:x}", Sha256::digest(b"secretalice"));
        assert_eq!(derive_path(&secret("secret"), "alice"), expected);
        assert_eq!(expected.len(), 64);
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            SecretKey::new(Vec::new()),
            Err(Error::InvalidSecret { .. })
        ));
    }

    #[test]
    fn generated_secret_is_hex() {
        let (key, printable) = SecretKey::generate();
        assert_eq!(printable.len(), GENERATED_SECRET_BYTES * 2);
        assert!(printable.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key.as_bytes(), printable.as_bytes());
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let rendered = format!("{:?}", secret("hunter2"));
        assert!(!rendered.contains("hunter2"));
    }
}
