//! Operator settings and the per-invocation context
//!
//! Settings live in one JSON or TOML file (picked by extension). Relative
//! paths inside it are resolved against the directory holding the file, so
//! a deployment directory can be moved as a whole.

use std::path::{Path, PathBuf};

use gdir_fs::ConfigStore;
use gdir_git::gist_remote_url;
use gdir_store::{RecordStore, SecretKey};
use serde::{Deserialize, Serialize};

use crate::cli::Target;
use crate::error::{CliError, Result};

/// Contents of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master secret sealing every record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Root holding the `accounts/`, `users/` and `static/` working copies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Directory of service-account key files last imported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accounts_source: Option<PathBuf>,

    /// Number of accounts imported so far
    pub account_count: usize,

    pub github: GithubSettings,

    pub targets: Targets,
}

/// Credentials for the gist owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targets {
    pub accounts: TargetSettings,
    pub users: TargetSettings,
    #[serde(rename = "static")]
    pub static_files: TargetSettings,
}

/// Where one target is published.
///
/// `gist` is an id or the gist's page URL. `url` wins over `gist` when
/// both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TargetSettings {
    pub fn is_configured(&self) -> bool {
        self.gist.is_some() || self.url.is_some()
    }
}

impl Targets {
    pub fn get(&self, target: Target) -> &TargetSettings {
        match target {
            Target::Accounts => &self.accounts,
            Target::Users => &self.users,
            Target::Static => &self.static_files,
        }
    }
}

/// Everything a command needs, built once in `main`.
#[derive(Debug)]
pub struct Context {
    config_path: PathBuf,
    base_dir: PathBuf,
    secret_override: Option<String>,
    pub settings: Settings,
}

impl Context {
    /// Load settings from `config_path` (missing file means defaults).
    pub fn load(config_path: &Path, secret_override: Option<String>) -> Result<Self> {
        let settings: Settings = ConfigStore::new().load_or_default(config_path)?;
        tracing::debug!(config = %config_path.display(), "loaded settings");

        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            config_path: config_path.to_path_buf(),
            base_dir,
            secret_override: secret_override.filter(|s| !s.is_empty()),
            settings,
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write the settings back to the configuration file.
    pub fn save(&self) -> Result<()> {
        ConfigStore::new().save(&self.config_path, &self.settings)?;
        tracing::debug!(config = %self.config_path.display(), "saved settings");
        Ok(())
    }

    /// `path` made absolute relative to the configuration file.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.settings.data_dir {
            Some(dir) => self.resolve(dir),
            None => self.base_dir.clone(),
        }
    }

    pub fn target_dir(&self, target: Target) -> PathBuf {
        self.data_dir().join(target.dir_name())
    }

    /// Whether a secret came from the command line or environment.
    pub fn has_secret_override(&self) -> bool {
        self.secret_override.is_some()
    }

    pub fn secret(&self) -> Result<SecretKey> {
        let value = self
            .secret_override
            .as_deref()
            .or(self.settings.secret.as_deref())
            .ok_or_else(|| {
                CliError::user("No secret configured. Run `gdir secret generate` first.")
            })?;
        Ok(SecretKey::new(value)?)
    }

    pub fn store(&self) -> Result<RecordStore> {
        Ok(RecordStore::new(self.data_dir(), self.secret()?))
    }

    /// Targets that have somewhere to publish to.
    pub fn configured_targets(&self) -> Vec<Target> {
        Target::ALL
            .into_iter()
            .filter(|t| self.settings.targets.get(*t).is_configured())
            .collect()
    }

    /// Remote URL of `target`, with credentials embedded for gists.
    pub fn remote_url(&self, target: Target) -> Result<String> {
        let settings = self.settings.targets.get(target);
        if let Some(url) = &settings.url {
            return Ok(url.clone());
        }
        let Some(gist) = &settings.gist else {
            return Err(CliError::user(format!(
                "No remote configured for target '{target}'. Set targets.{target}.gist or targets.{target}.url."
            )));
        };
        let github = &self.settings.github;
        match (&github.user, &github.token) {
            (Some(user), Some(token)) => Ok(gist_remote_url(user, token, gist)?),
            _ => Err(CliError::user(
                "github.user and github.token are required to publish to gists",
            )),
        }
    }
}
