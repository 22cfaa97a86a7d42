//! Directory-backed record store

use std::path::{Path, PathBuf};

use gdir_fs::io;

use crate::crypto::{self, RecordKind, SecretKey};
use crate::{Error, Result, User};

/// Subdirectory holding user records
pub const USERS_DIR: &str = "users";

/// Subdirectory holding service-account records
pub const ACCOUNTS_DIR: &str = "accounts";

/// A user read back from disk, with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    pub file_name: String,
    pub user: User,
}

/// Encrypted records under one root directory, sealed with one secret.
///
/// The root usually holds one git working copy per record kind
/// (`users/`, `accounts/`), which is what gets published.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
    secret: SecretKey,
}

impl RecordStore {
    pub fn new(root: impl Into<PathBuf>, secret: SecretKey) -> Self {
        Self {
            root: root.into(),
            secret,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn secret(&self) -> &SecretKey {
        &self.secret
    }

    pub fn users_dir(&self) -> PathBuf {
        self.root.join(USERS_DIR)
    }

    pub fn accounts_dir(&self) -> PathBuf {
        self.root.join(ACCOUNTS_DIR)
    }

    /// Where the record for user `name` lives.
    pub fn user_path(&self, name: &str) -> PathBuf {
        self.users_dir()
            .join(crypto::derive_path(&self.secret, name))
    }

    /// Seal `plaintext` and write it to `path`.
    pub fn write_record(&self, path: &Path, kind: &RecordKind, plaintext: &[u8]) -> Result<()> {
        let record = crypto::encrypt(&self.secret, kind, plaintext)?;
        io::write_atomic(path, &record)?;
        Ok(())
    }

    /// Read and open the record at `path`.
    ///
    /// A missing file is [`Error::NotFound`] named after the file.
    pub fn read_record(&self, path: &Path, kind: &RecordKind) -> Result<Vec<u8>> {
        let record = io::read_bytes(path).map_err(|e| match e {
            gdir_fs::Error::NotFound { path } => Error::NotFound {
                kind: kind.to_string(),
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            },
            other => Error::Fs(other),
        })?;
        crypto::decrypt(&self.secret, kind, &record)
    }

    /// Create or overwrite a user.
    ///
    /// Returns the path written.
    pub fn save_user(&self, user: &User) -> Result<PathBuf> {
        user.access().map_err(|source| Error::InvalidAccess {
            name: user.name.clone(),
            source,
        })?;

        let document = serde_json::to_vec(user).map_err(|source| Error::Json {
            kind: RecordKind::USER.to_string(),
            source,
        })?;

        let path = self.user_path(&user.name);
        self.write_record(&path, &RecordKind::USER, &document)?;
        tracing::info!(user = %user.name, path = %path.display(), "saved user");
        Ok(path)
    }

    /// Load a user by name.
    pub fn load_user(&self, name: &str) -> Result<User> {
        self.load_user_at(&self.user_path(name))
            .map_err(|e| match e {
                Error::NotFound { kind, .. } => Error::NotFound {
                    kind,
                    name: name.to_string(),
                },
                other => other,
            })
    }

    /// Load the user stored at `path`.
    pub fn load_user_at(&self, path: &Path) -> Result<User> {
        let document = self.read_record(path, &RecordKind::USER)?;
        serde_json::from_slice(&document).map_err(|source| Error::Json {
            kind: RecordKind::USER.to_string(),
            source,
        })
    }

    /// Delete a user.
    ///
    /// Returns `false` if there was no such user.
    pub fn remove_user(&self, name: &str) -> Result<bool> {
        let path = self.user_path(name);
        let removed = io::remove_file(&path)?;
        if removed {
            tracing::info!(user = %name, "removed user");
        } else {
            tracing::debug!(user = %name, "no user to remove");
        }
        Ok(removed)
    }

    /// Save `user` under its (new) name and drop the record for `old_name`.
    ///
    /// Lookup is by derived path, so a rename is a save plus a delete. The
    /// new record is written first; if the delete then fails both exist.
    pub fn rename_user(&self, old_name: &str, user: &User) -> Result<PathBuf> {
        let path = self.save_user(user)?;
        if old_name != user.name {
            self.remove_user(old_name)?;
        }
        Ok(path)
    }

    /// Every user record, in file-name order.
    ///
    /// Any record that cannot be opened aborts the listing. A store with no
    /// `users/` directory yet has no users.
    pub fn list_users(&self) -> Result<Vec<StoredUser>> {
        let files = match io::list_files(&self.users_dir()) {
            Ok(files) => files,
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        files
            .iter()
            .map(|path| {
                Ok(StoredUser {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    user: self.load_user_at(path)?,
                })
            })
            .collect()
    }

    /// Whether at least one user record exists.
    pub fn has_users(&self) -> Result<bool> {
        match io::list_files(&self.users_dir()) {
            Ok(files) => Ok(!files.is_empty()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
