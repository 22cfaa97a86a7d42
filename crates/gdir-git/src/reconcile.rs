//! Idempotent working-copy reconciliation
//!
//! After [`reconcile`] returns, the directory is a git working copy with:
//! - remote `origin` pointing at the given URL
//! - local `user.name`/`user.email` set to [`DEPLOY_IDENTITY`]
//! - HEAD on `master`, which tracks `origin/master`
//!
//! Nothing is written when a setting is already correct, so a second call
//! with the same arguments reports no changes.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::{BranchType, ConfigLevel, ErrorCode, FetchOptions, Repository};

use crate::error::GitContext;
use crate::remote::{Credentials, redact_url, remote_callbacks};
use crate::{BRANCH, DEPLOY_IDENTITY, Error, REMOTE_NAME, Result};

/// One correction made by [`reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The directory was missing or empty and was cloned from the remote.
    Cloned,
    /// `origin` did not exist and was added.
    RemoteAdded,
    /// `origin` pointed somewhere else and was corrected.
    RemoteUrlUpdated,
    /// The local author identity was written.
    IdentitySet,
    /// Local `master` was created from `origin/master`.
    BranchCreated,
    /// HEAD was moved onto `master`.
    HeadMoved,
    /// `master` was configured to track `origin/master`.
    TrackingSet,
}

/// What [`reconcile`] had to do to one working copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub path: PathBuf,
    pub changes: Vec<Change>,
}

impl ReconcileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            changes: Vec::new(),
        }
    }

    /// True when the working copy was already in the expected state.
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn contains(&self, change: Change) -> bool {
        self.changes.contains(&change)
    }

    fn record(&mut self, change: Change) {
        tracing::info!(path = %self.path.display(), ?change, "reconciled");
        self.changes.push(change);
    }
}

/// Bring `dir` into a known-good state as a working copy of `remote_url`.
///
/// An existing repository is used in place. A missing or empty directory is
/// cloned into. Any other existing directory is refused with
/// [`Error::Conflict`] rather than being overwritten.
pub fn reconcile(dir: &Path, remote_url: &str) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::new(dir);
    tracing::debug!(path = %dir.display(), remote = %redact_url(remote_url), "reconciling");

    let repo = match Repository::open(dir) {
        Ok(repo) => repo,
        Err(e) if e.code() == ErrorCode::NotFound => {
            ensure_clone_target(dir)?;
            let repo = clone(dir, remote_url)?;
            report.record(Change::Cloned);
            repo
        }
        Err(e) => return Err(e).git("open", dir),
    };

    ensure_remote(&repo, dir, remote_url, &mut report)?;
    ensure_identity(&repo, dir, &mut report)?;
    ensure_branch(&repo, dir, &mut report)?;

    if report.is_noop() {
        tracing::debug!(path = %dir.display(), "working copy already reconciled");
    }
    Ok(report)
}

/// A clone may only land in a directory that is missing or empty.
fn ensure_clone_target(dir: &Path) -> Result<()> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(Error::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    if entries.next().is_some() {
        return Err(Error::Conflict {
            path: dir.to_path_buf(),
            reason: "directory is not empty and is not a git repository".to_string(),
        });
    }
    Ok(())
}

fn clone(dir: &Path, remote_url: &str) -> Result<Repository> {
    tracing::info!(path = %dir.display(), remote = %redact_url(remote_url), "cloning");

    let credentials = Credentials::from_url(remote_url);
    let mut fetch = FetchOptions::new();
    fetch.remote_callbacks(remote_callbacks(credentials.as_ref()));

    RepoBuilder::new()
        .fetch_options(fetch)
        .clone(remote_url, dir)
        .git("clone", dir)
}

fn ensure_remote(
    repo: &Repository,
    dir: &Path,
    remote_url: &str,
    report: &mut ReconcileReport,
) -> Result<()> {
    match repo.find_remote(REMOTE_NAME) {
        Ok(remote) => {
            if remote.url() != Some(remote_url) {
                repo.remote_set_url(REMOTE_NAME, remote_url)
                    .git("set remote URL", dir)?;
                report.record(Change::RemoteUrlUpdated);
            }
        }
        Err(e) if e.code() == ErrorCode::NotFound => {
            repo.remote(REMOTE_NAME, remote_url).git("add remote", dir)?;
            report.record(Change::RemoteAdded);
        }
        Err(e) => return Err(e).git("find remote", dir),
    }
    Ok(())
}

fn ensure_identity(repo: &Repository, dir: &Path, report: &mut ReconcileReport) -> Result<()> {
    let mut config = local_config(repo, dir)?;

    let mut changed = false;
    for (key, expected) in [
        ("user.name", DEPLOY_IDENTITY.name),
        ("user.email", DEPLOY_IDENTITY.email),
    ] {
        if read_entry(&config, key, dir)?.as_deref() != Some(expected) {
            config.set_str(key, expected).git("write config", dir)?;
            changed = true;
        }
    }

    if changed {
        report.record(Change::IdentitySet);
    }
    Ok(())
}

fn ensure_branch(repo: &Repository, dir: &Path, report: &mut ReconcileReport) -> Result<()> {
    let local_exists = match repo.find_branch(BRANCH, BranchType::Local) {
        Ok(_) => true,
        Err(e) if e.code() == ErrorCode::NotFound => false,
        Err(e) => return Err(e).git("find branch", dir),
    };

    let mut branch_exists = local_exists;
    if !local_exists {
        let upstream = format!("{REMOTE_NAME}/{BRANCH}");
        match repo.find_branch(&upstream, BranchType::Remote) {
            Ok(remote_branch) => {
                let commit = remote_branch
                    .get()
                    .peel_to_commit()
                    .git("resolve upstream", dir)?;
                repo.branch(BRANCH, &commit, false).git("create branch", dir)?;
                report.record(Change::BranchCreated);
                branch_exists = true;
            }
            // Empty remote: master stays unborn until the first deploy
            Err(e) if e.code() == ErrorCode::NotFound => {}
            Err(e) => return Err(e).git("find upstream", dir),
        }
    }

    let branch_ref = format!("refs/heads/{BRANCH}");
    let head = repo.find_reference("HEAD").git("read HEAD", dir)?;
    if head.symbolic_target() != Some(branch_ref.as_str()) {
        // Checkout diffs against the current HEAD, so it must run before HEAD moves
        if branch_exists {
            let commit = repo
                .find_reference(&branch_ref)
                .and_then(|reference| reference.peel_to_commit())
                .git("resolve branch", dir)?;
            let mut checkout = CheckoutBuilder::new();
            checkout.safe();
            repo.checkout_tree(commit.as_object(), Some(&mut checkout))
                .git("checkout", dir)?;
        }
        repo.set_head(&branch_ref).git("set HEAD", dir)?;
        report.record(Change::HeadMoved);
    }

    let mut config = local_config(repo, dir)?;
    let mut changed = false;
    for (key, expected) in [
        (format!("branch.{BRANCH}.remote"), REMOTE_NAME.to_string()),
        (format!("branch.{BRANCH}.merge"), branch_ref.clone()),
    ] {
        if read_entry(&config, &key, dir)?.as_deref() != Some(expected.as_str()) {
            config.set_str(&key, &expected).git("write config", dir)?;
            changed = true;
        }
    }
    if changed {
        report.record(Change::TrackingSet);
    }

    Ok(())
}

/// The repository's own `.git/config`, ignoring global and system files.
fn local_config(repo: &Repository, dir: &Path) -> Result<git2::Config> {
    repo.config()
        .and_then(|config| config.open_level(ConfigLevel::Local))
        .git("open config", dir)
}

fn read_entry(config: &git2::Config, key: &str, dir: &Path) -> Result<Option<String>> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e).git("read config", dir),
    }
}
