//! Commit-and-force-push publishing

use std::cell::RefCell;
use std::path::Path;

use git2::{ErrorCode, IndexAddOption, Oid, PushOptions, Repository, Signature, StatusOptions};

use crate::error::GitContext;
use crate::remote::{Credentials, redact_url, remote_callbacks};
use crate::{BRANCH, DEPLOY_IDENTITY, Error, REMOTE_NAME, Result};

/// Message of every deploy commit
pub const DEPLOY_MESSAGE: &str = "[gdir] deploy";

/// Outcome of a [`deploy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// The commit that was pushed, or `None` if the tree was clean.
    pub commit: Option<Oid>,
    /// Paths staged as additions or modifications.
    pub staged: usize,
    /// Paths staged as deletions.
    pub removed: usize,
}

impl DeployReport {
    pub fn is_clean(&self) -> bool {
        self.commit.is_none()
    }
}

/// Publish the working copy at `dir`.
///
/// A clean tree is a no-op: no commit and no network traffic. Otherwise every
/// change, including deletions, is committed on `master` as
/// [`DEPLOY_IDENTITY`] and force-pushed to `origin`. If the push fails the
/// commit stays local; [`push`] re-publishes it.
pub fn deploy(dir: &Path) -> Result<DeployReport> {
    let repo = Repository::open(dir).git("open", dir)?;

    let mut options = StatusOptions::new();
    options
        .include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false);
    let statuses = repo.statuses(Some(&mut options)).git("status", dir)?;

    if statuses.is_empty() {
        tracing::info!(path = %dir.display(), "nothing to deploy");
        return Ok(DeployReport::default());
    }

    let mut index = repo.index().git("open index", dir)?;
    let mut report = DeployReport::default();

    for entry in statuses.iter() {
        let Some(path) = entry.path() else {
            tracing::warn!(path = %dir.display(), "skipping status entry with non UTF-8 path");
            continue;
        };
        if entry.status().is_wt_deleted() {
            tracing::debug!(file = path, "staging removal");
            index.remove_path(Path::new(path)).git("stage removal", dir)?;
            report.removed += 1;
        } else {
            report.staged += 1;
        }
    }
    drop(statuses);

    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .git("stage changes", dir)?;
    index.write().git("write index", dir)?;
    let tree_id = index.write_tree().git("write tree", dir)?;
    let tree = repo.find_tree(tree_id).git("find tree", dir)?;

    let signature =
        Signature::now(DEPLOY_IDENTITY.name, DEPLOY_IDENTITY.email).git("create signature", dir)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().git("resolve HEAD", dir)?),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
        Err(e) => return Err(e).git("read HEAD", dir),
    };
    let parents: Vec<_> = parent.iter().collect();

    let commit = repo
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            DEPLOY_MESSAGE,
            &tree,
            &parents,
        )
        .git("commit", dir)?;
    report.commit = Some(commit);

    tracing::info!(
        path = %dir.display(),
        commit = %commit,
        staged = report.staged,
        removed = report.removed,
        "committed deploy"
    );

    force_push(&repo, dir)?;
    Ok(report)
}

/// Force-push local `master` to `origin` without committing anything.
pub fn push(dir: &Path) -> Result<()> {
    let repo = Repository::open(dir).git("open", dir)?;
    force_push(&repo, dir)
}

fn force_push(repo: &Repository, dir: &Path) -> Result<()> {
    let reference = format!("refs/heads/{BRANCH}");
    let refspec = format!("+{reference}:{reference}");

    let mut remote = repo.find_remote(REMOTE_NAME).git("find remote", dir)?;
    let url = remote.url().unwrap_or_default().to_string();
    let credentials = Credentials::from_url(&url);

    let rejection: RefCell<Option<(String, String)>> = RefCell::new(None);

    let mut callbacks = remote_callbacks(credentials.as_ref());
    callbacks.push_update_reference(|refname, status| {
        if let Some(message) = status {
            *rejection.borrow_mut() = Some((refname.to_string(), message.to_string()));
        }
        Ok(())
    });

    let mut options = PushOptions::new();
    options.remote_callbacks(callbacks);

    tracing::debug!(path = %dir.display(), remote = %redact_url(&url), refspec = %refspec, "pushing");
    remote
        .push(&[refspec.as_str()], Some(&mut options))
        .git("push", dir)?;

    if let Some((reference, message)) = rejection.take() {
        return Err(Error::PushRejected { reference, message });
    }

    tracing::info!(path = %dir.display(), remote = %redact_url(&url), "pushed {}", BRANCH);
    Ok(())
}
