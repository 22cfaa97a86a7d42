//! Git fixtures built directly with `git2`.
//!
//! Remotes are bare repositories on local paths, which libgit2 clones and
//! pushes to like any other URL. Nothing here shells out to the `git` CLI,
//! so the tests do not depend on a user identity or global config.
//!
//! All helpers panic on failure; they are for test setup only.

use std::path::Path;

use git2::{
    Commit, ObjectType, Oid, Repository, RepositoryInitOptions, Signature, TreeWalkMode,
    TreeWalkResult,
};

/// Branch every fixture commits to
pub const FIXTURE_BRANCH: &str = "refs/heads/master";

/// Initialises a bare repository whose HEAD points at `master`.
///
/// Realism level: **REAL**: valid object store, empty history, so a clone
/// of it has an unborn `master`.
///
/// # Panics
/// Panics if the repository cannot be created.
pub fn bare_remote(path: &Path) -> Repository {
    let mut options = RepositoryInitOptions::new();
    options.bare(true).initial_head("master");
    Repository::init_opts(path, &options).unwrap_or_else(|e| {
        panic!("bare_remote: failed to init at {}: {e}", path.display())
    })
}

/// Commits a snapshot of `files` on `master`, replacing whatever tree the
/// branch had before. Works on bare repositories.
///
/// Files are `(name, contents)` pairs at the top level of the tree.
///
/// # Panics
/// Panics if any object cannot be written.
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) -> Oid {
    commit_files_on(repo, FIXTURE_BRANCH, files, message)
}

/// Like [`commit_files`], but on any branch reference (`refs/heads/...`).
/// The branch is created when it does not exist yet.
pub fn commit_files_on(
    repo: &Repository,
    reference: &str,
    files: &[(&str, &str)],
    message: &str,
) -> Oid {
    let mut builder = repo
        .treebuilder(None)
        .unwrap_or_else(|e| panic!("commit_files: treebuilder: {e}"));
    for (name, contents) in files {
        let blob = repo
            .blob(contents.as_bytes())
            .unwrap_or_else(|e| panic!("commit_files: blob {name}: {e}"));
        builder
            .insert(*name, blob, 0o100644)
            .unwrap_or_else(|e| panic!("commit_files: insert {name}: {e}"));
    }
    let tree_id = builder
        .write()
        .unwrap_or_else(|e| panic!("commit_files: write tree: {e}"));
    let tree = repo.find_tree(tree_id).unwrap();

    let signature = Signature::now("fixture", "fixture@example.com").unwrap();
    let parent = branch_commit(repo, reference);
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    repo.commit(
        Some(reference),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .unwrap_or_else(|e| panic!("commit_files: commit: {e}"))
}

/// Tip of `master`, or `None` while the branch is unborn.
pub fn master_commit(repo: &Repository) -> Option<Commit<'_>> {
    branch_commit(repo, FIXTURE_BRANCH)
}

/// Tip of `reference`, or `None` while it does not exist.
pub fn branch_commit<'r>(repo: &'r Repository, reference: &str) -> Option<Commit<'r>> {
    repo.find_reference(reference).ok()?.peel_to_commit().ok()
}

/// Every blob path in the tree at the tip of `master`, sorted.
///
/// # Panics
/// Panics if `master` is unborn.
pub fn master_paths(repo: &Repository) -> Vec<String> {
    let commit = master_commit(repo).expect("master_paths: master is unborn");
    let tree = commit.tree().unwrap();

    let mut paths = Vec::new();
    tree.walk(TreeWalkMode::PreOrder, |root, entry| {
        if entry.kind() == Some(ObjectType::Blob)
            && let Some(name) = entry.name()
        {
            paths.push(format!("{root}{name}"));
        }
        TreeWalkResult::Ok
    })
    .unwrap();
    paths.sort();
    paths
}

/// Contents of `path` at the tip of `master`, if present.
pub fn master_file(repo: &Repository, path: &str) -> Option<String> {
    let commit = master_commit(repo)?;
    let entry = commit.tree().ok()?.get_path(Path::new(path)).ok()?;
    let blob = repo.find_blob(entry.id()).ok()?;
    Some(String::from_utf8_lossy(blob.content()).into_owned())
}

/// Number of commits reachable from `master` (0 while unborn).
pub fn commit_count(repo: &Repository) -> usize {
    let Some(commit) = master_commit(repo) else {
        return 0;
    };
    let mut walk = repo.revwalk().unwrap();
    walk.push(commit.id()).unwrap();
    walk.count()
}
