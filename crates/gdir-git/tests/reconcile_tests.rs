//! Tests for working-copy reconciliation against local bare remotes

use std::fs;

use gdir_git::{Change, DEPLOY_IDENTITY, Error, REMOTE_NAME, deploy, reconcile};
use gdir_test_utils::{TestRemote, git};
use git2::build::CheckoutBuilder;
use git2::{ConfigLevel, Repository, RepositoryInitOptions};
use pretty_assertions::assert_eq;

fn local_config_value(repo: &Repository, key: &str) -> Option<String> {
    repo.config()
        .unwrap()
        .open_level(ConfigLevel::Local)
        .unwrap()
        .get_string(key)
        .ok()
}

fn origin_url(repo: &Repository) -> Option<String> {
    repo.find_remote(REMOTE_NAME)
        .ok()
        .and_then(|r| r.url().map(str::to_string))
}

#[test]
fn clones_into_missing_directory() {
    let remote = TestRemote::seeded(&[("README.md", "# users")]);
    let work = remote.work_dir("users");

    let report = reconcile(&work, &remote.url()).unwrap();

    assert!(report.contains(Change::Cloned));
    assert_eq!(fs::read_to_string(work.join("README.md")).unwrap(), "# users");

    let repo = Repository::open(&work).unwrap();
    assert_eq!(origin_url(&repo), Some(remote.url()));
    assert_eq!(
        repo.find_reference("HEAD").unwrap().symbolic_target(),
        Some("refs/heads/master")
    );
    assert_eq!(
        local_config_value(&repo, "user.name").as_deref(),
        Some(DEPLOY_IDENTITY.name)
    );
    assert_eq!(
        local_config_value(&repo, "user.email").as_deref(),
        Some(DEPLOY_IDENTITY.email)
    );
    assert_eq!(
        local_config_value(&repo, "branch.master.remote").as_deref(),
        Some("origin")
    );
    assert_eq!(
        local_config_value(&repo, "branch.master.merge").as_deref(),
        Some("refs/heads/master")
    );
}

#[test]
fn second_run_is_a_noop() {
    let remote = TestRemote::seeded(&[("README.md", "# users")]);
    let work = remote.work_dir("users");

    let first = reconcile(&work, &remote.url()).unwrap();
    let second = reconcile(&work, &remote.url()).unwrap();

    assert!(!first.is_noop());
    assert!(second.is_noop(), "unexpected changes: {:?}", second.changes);
}

#[test]
fn clones_into_empty_directory() {
    let remote = TestRemote::seeded(&[("README.md", "x")]);
    let work = remote.work_dir("accounts");
    fs::create_dir(&work).unwrap();

    let report = reconcile(&work, &remote.url()).unwrap();

    assert!(report.contains(Change::Cloned));
    assert!(work.join("README.md").exists());
}

#[test]
fn empty_remote_leaves_master_unborn() {
    let remote = TestRemote::empty();
    let work = remote.work_dir("static");

    reconcile(&work, &remote.url()).unwrap();

    let repo = Repository::open(&work).unwrap();
    assert!(repo.head().is_err());
    assert_eq!(
        repo.find_reference("HEAD").unwrap().symbolic_target(),
        Some("refs/heads/master")
    );
    assert!(reconcile(&work, &remote.url()).unwrap().is_noop());
}

#[test]
fn corrects_wrong_origin_url() {
    let remote = TestRemote::seeded(&[("README.md", "x")]);
    let work = remote.work_dir("users");
    reconcile(&work, &remote.url()).unwrap();

    let repo = Repository::open(&work).unwrap();
    repo.remote_set_url(REMOTE_NAME, "/somewhere/else.git").unwrap();

    let report = reconcile(&work, &remote.url()).unwrap();

    assert_eq!(report.changes, vec![Change::RemoteUrlUpdated]);
    assert_eq!(origin_url(&Repository::open(&work).unwrap()), Some(remote.url()));
}

#[test]
fn adds_origin_to_existing_repository() {
    let remote = TestRemote::seeded(&[("README.md", "x")]);
    let work = remote.work_dir("users");
    let mut options = RepositoryInitOptions::new();
    options.initial_head("master");
    Repository::init_opts(&work, &options).unwrap();

    let report = reconcile(&work, &remote.url()).unwrap();

    assert!(!report.contains(Change::Cloned));
    assert!(report.contains(Change::RemoteAdded));
    assert!(report.contains(Change::IdentitySet));
    assert!(report.contains(Change::TrackingSet));
    assert!(reconcile(&work, &remote.url()).unwrap().is_noop());
}

#[test]
fn rewrites_only_a_drifted_identity() {
    let remote = TestRemote::seeded(&[("README.md", "x")]);
    let work = remote.work_dir("users");
    reconcile(&work, &remote.url()).unwrap();

    let repo = Repository::open(&work).unwrap();
    repo.config()
        .unwrap()
        .open_level(ConfigLevel::Local)
        .unwrap()
        .set_str("user.name", "someone else")
        .unwrap();

    let report = reconcile(&work, &remote.url()).unwrap();

    assert_eq!(report.changes, vec![Change::IdentitySet]);
    assert_eq!(
        local_config_value(&repo, "user.name").as_deref(),
        Some(DEPLOY_IDENTITY.name)
    );
}

#[test]
fn refuses_non_empty_directory_without_repository() {
    let remote = TestRemote::seeded(&[("README.md", "x")]);
    let work = remote.work_dir("users");
    fs::create_dir(&work).unwrap();
    fs::write(work.join("precious.txt"), "keep me").unwrap();

    let err = reconcile(&work, &remote.url()).unwrap_err();

    match err {
        Error::Conflict { path, .. } => assert_eq!(path, work),
        other => panic!("expected Conflict, got {other:?}"),
    }
    assert_eq!(
        fs::read_to_string(work.join("precious.txt")).unwrap(),
        "keep me"
    );
    assert!(!work.join(".git").exists());
}

#[test]
fn clone_failure_names_the_operation() {
    let remote = TestRemote::empty();
    let work = remote.work_dir("users");
    let missing = remote.root().join("missing.git");

    let err = reconcile(&work, &missing.to_string_lossy()).unwrap_err();

    assert!(
        matches!(err, Error::Git { operation: "clone", .. }),
        "got {err:?}"
    );
}

#[test]
fn clone_switches_to_master_when_remote_head_is_elsewhere() {
    let remote = TestRemote::seeded(&[("a", "master-a")]);
    remote.commit_on_branch("main", &[("a", "main-a"), ("m", "only on main")], "main work");
    remote.set_head("main");
    let work = remote.work_dir("users");

    let report = reconcile(&work, &remote.url()).unwrap();

    assert!(report.contains(Change::BranchCreated));
    assert!(report.contains(Change::HeadMoved));
    assert_eq!(fs::read_to_string(work.join("a")).unwrap(), "master-a");
    assert!(!work.join("m").exists());

    let repo = Repository::open(&work).unwrap();
    assert!(repo.statuses(None).unwrap().is_empty());
    assert!(deploy(&work).unwrap().is_clean());
    assert_eq!(remote.paths(), vec!["a"]);
    assert_eq!(remote.file("a").as_deref(), Some("master-a"));
}

#[test]
fn moves_head_from_another_local_branch_onto_master() {
    let remote = TestRemote::seeded(&[("a", "master-a")]);
    let work = remote.work_dir("users");
    reconcile(&work, &remote.url()).unwrap();

    let repo = Repository::open(&work).unwrap();
    let other = git::commit_files_on(
        &repo,
        "refs/heads/other",
        &[("a", "other-a"), ("b", "only on other")],
        "other work",
    );
    let mut force = CheckoutBuilder::new();
    force.force();
    repo.checkout_tree(repo.find_commit(other).unwrap().as_object(), Some(&mut force))
        .unwrap();
    repo.set_head("refs/heads/other").unwrap();
    assert_eq!(fs::read_to_string(work.join("a")).unwrap(), "other-a");

    let report = reconcile(&work, &remote.url()).unwrap();

    assert_eq!(report.changes, vec![Change::HeadMoved]);
    assert_eq!(fs::read_to_string(work.join("a")).unwrap(), "master-a");
    assert!(!work.join("b").exists());
    assert!(repo.statuses(None).unwrap().is_empty());

    assert!(deploy(&work).unwrap().is_clean());
    assert_eq!(remote.paths(), vec!["a"]);
}
