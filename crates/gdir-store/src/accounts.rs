//! Service-account import
//!
//! Accounts are addressed by a dense index (`accounts/0`, `accounts/1`, ...)
//! because the consumer picks them by number.

use std::path::{Path, PathBuf};

use gdir_fs::io;

use crate::crypto::RecordKind;
use crate::{Error, RecordStore, Result};

impl RecordStore {
    pub fn account_path(&self, index: usize) -> PathBuf {
        self.accounts_dir().join(index.to_string())
    }

    /// Encrypt every service-account key file in `source` into the store.
    ///
    /// Picks non-empty `*.json` regular files in file-name order and numbers
    /// them from zero. Existing account records are cleared first so the
    /// result is exactly the re-scanned set. Returns the number imported.
    pub fn import_accounts(&self, source: &Path) -> Result<usize> {
        let candidates = io::list_files(source)?;

        let mut keys = Vec::new();
        for path in candidates {
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                continue;
            }
            let bytes = io::read_bytes(&path)?;
            if bytes.is_empty() {
                tracing::warn!(file = %path.display(), "skipping empty account file");
                continue;
            }
            keys.push((path, bytes));
        }

        self.clear_accounts()?;
        io::create_private_dir(&self.accounts_dir())?;

        for (index, (path, bytes)) in keys.iter().enumerate() {
            tracing::info!(index, file = %path.display(), "encrypting account");
            self.write_record(&self.account_path(index), &RecordKind::ACCOUNT, bytes)?;
        }

        Ok(keys.len())
    }

    /// Decrypt account number `index`.
    pub fn load_account(&self, index: usize) -> Result<Vec<u8>> {
        self.read_record(&self.account_path(index), &RecordKind::ACCOUNT)
            .map_err(|e| match e {
                Error::NotFound { kind, .. } => Error::NotFound {
                    kind,
                    name: index.to_string(),
                },
                other => other,
            })
    }

    /// Number of account records on disk.
    pub fn count_accounts(&self) -> Result<usize> {
        Ok(self.account_files()?.len())
    }

    fn account_files(&self) -> Result<Vec<PathBuf>> {
        match io::list_files(&self.accounts_dir()) {
            Ok(files) => Ok(files
                .into_iter()
                .filter(|p| {
                    p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.parse::<usize>().is_ok())
                })
                .collect()),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn clear_accounts(&self) -> Result<()> {
        for path in self.account_files()? {
            io::remove_file(&path)?;
        }
        Ok(())
    }
}
