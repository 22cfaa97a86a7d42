//! [`TestRemote`] scratch area for reconcile and deploy scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tempfile::TempDir;

use crate::git;

/// A temporary directory holding one bare remote (`remote.git`) and any
/// number of working-copy paths next to it.
///
/// # Example
///
/// ```rust,no_run
/// use gdir_test_utils::TestRemote;
///
/// let remote = TestRemote::seeded(&[("README.md", "# users")]);
/// let work = remote.work_dir("users");
/// // reconcile(&work, &remote.url())
/// assert_eq!(remote.paths(), vec!["README.md"]);
/// ```
pub struct TestRemote {
    temp_dir: TempDir,
}

impl Default for TestRemote {
    fn default() -> Self {
        Self::empty()
    }
}

impl TestRemote {
    /// A remote with no commits.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().unwrap();
        git::bare_remote(&temp_dir.path().join("remote.git"));
        Self { temp_dir }
    }

    /// A remote whose `master` has one commit containing `files`.
    pub fn seeded(files: &[(&str, &str)]) -> Self {
        let remote = Self::empty();
        git::commit_files(&remote.repo(), files, "initial");
        remote
    }

    /// Root of the scratch area.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the bare remote.
    pub fn remote_path(&self) -> PathBuf {
        self.root().join("remote.git")
    }

    /// URL to hand to clone/push. A plain local path.
    pub fn url(&self) -> String {
        self.remote_path().to_string_lossy().into_owned()
    }

    /// A fresh (not yet existing) working-copy path called `name`.
    pub fn work_dir(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Open the bare remote.
    pub fn repo(&self) -> Repository {
        Repository::open_bare(self.remote_path()).unwrap()
    }

    /// Blob paths on the remote's `master`.
    pub fn paths(&self) -> Vec<String> {
        git::master_paths(&self.repo())
    }

    /// Contents of `path` on the remote's `master`.
    pub fn file(&self, path: &str) -> Option<String> {
        git::master_file(&self.repo(), path)
    }

    /// Commit message at the tip of the remote's `master`.
    pub fn head_message(&self) -> Option<String> {
        let repo = self.repo();
        let commit = git::master_commit(&repo)?;
        commit.message().map(str::to_string)
    }

    /// Commits reachable from the remote's `master`.
    pub fn commit_count(&self) -> usize {
        git::commit_count(&self.repo())
    }

    /// Push a diverging commit straight into the remote, as another writer
    /// would.
    pub fn commit_elsewhere(&self, files: &[(&str, &str)], message: &str) {
        git::commit_files(&self.repo(), files, message);
    }

    /// Commit `files` on branch `name` of the remote, creating it if needed.
    pub fn commit_on_branch(&self, name: &str, files: &[(&str, &str)], message: &str) {
        git::commit_files_on(&self.repo(), &format!("refs/heads/{name}"), files, message);
    }

    /// Point the remote's HEAD at branch `name`, which clones then check out.
    pub fn set_head(&self, name: &str) {
        self.repo()
            .set_head(&format!("refs/heads/{name}"))
            .unwrap();
    }

    /// Make the remote refuse updates to `master` by holding its ref lock,
    /// as a concurrent writer would. Pushes then fail per reference.
    pub fn lock_master(&self) {
        let lock = self.remote_path().join("refs/heads/master.lock");
        fs::create_dir_all(lock.parent().unwrap()).unwrap();
        fs::write(lock, "").unwrap();
    }

    /// Write `contents` to `relative` inside the working copy `work`.
    pub fn write(&self, work: &Path, relative: &str, contents: &str) {
        let path = work.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}
