//! Sync and push command implementations
//!
//! Each target is reconciled with its remote before anything is published,
//! so a rotated token or changed gist id in the settings takes effect on the
//! next run.

use colored::Colorize;
use gdir_git::{Change, ReconcileReport};

use crate::cli::Target;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Targets a sync or push applies to.
fn selected_targets(ctx: &Context, target: Option<Target>) -> Result<Vec<Target>> {
    if let Some(target) = target {
        return Ok(vec![target]);
    }
    let targets = ctx.configured_targets();
    if targets.is_empty() {
        return Err(CliError::user(
            "No targets configured. Add targets.<accounts|users|static>.gist or .url to the configuration file.",
        ));
    }
    Ok(targets)
}

fn describe(change: Change) -> &'static str {
    match change {
        Change::Cloned => "cloned from remote",
        Change::RemoteAdded => "added origin",
        Change::RemoteUrlUpdated => "updated origin URL",
        Change::IdentitySet => "set author identity",
        Change::BranchCreated => "created master",
        Change::HeadMoved => "switched to master",
        Change::TrackingSet => "set master to track origin/master",
    }
}

fn print_reconcile(target: Target, report: &ReconcileReport) {
    for change in &report.changes {
        println!("   {} {}", format!("{target}:").dimmed(), describe(*change));
    }
}

/// Reconcile `target` if it has a remote configured.
///
/// Commands that write records call this first so the records land in a
/// working copy instead of a plain directory that a later clone would refuse.
pub fn prepare(ctx: &Context, target: Target) -> Result<()> {
    if !ctx.settings.targets.get(target).is_configured() {
        tracing::debug!(%target, "no remote configured, writing to plain directory");
        return Ok(());
    }
    let report = gdir_git::reconcile(&ctx.target_dir(target), &ctx.remote_url(target)?)?;
    print_reconcile(target, &report);
    Ok(())
}

/// Run the sync command
///
/// Reconciles each target's working copy and publishes any changes.
pub fn run_sync(ctx: &Context, target: Option<Target>) -> Result<()> {
    for target in selected_targets(ctx, target)? {
        println!("{} Syncing {}...", "=>".blue().bold(), target.to_string().cyan());

        let dir = ctx.target_dir(target);
        let reconciled = gdir_git::reconcile(&dir, &ctx.remote_url(target)?)?;
        print_reconcile(target, &reconciled);

        let report = gdir_git::deploy(&dir)?;
        match report.commit {
            None => println!("{} {} is up to date", "OK".green().bold(), target),
            Some(commit) => println!(
                "{} Published {} ({} changed, {} removed) at {}",
                "OK".green().bold(),
                target,
                report.staged,
                report.removed,
                format!("{commit:.7}").yellow()
            ),
        }
    }
    Ok(())
}

/// Run the push command
///
/// Force-pushes what is already committed, for retrying a failed sync.
pub fn run_push(ctx: &Context, target: Option<Target>) -> Result<()> {
    for target in selected_targets(ctx, target)? {
        println!("{} Pushing {}...", "=>".blue().bold(), target.to_string().cyan());

        let dir = ctx.target_dir(target);
        let reconciled = gdir_git::reconcile(&dir, &ctx.remote_url(target)?)?;
        print_reconcile(target, &reconciled);

        gdir_git::push(&dir)?;
        println!("{} Pushed {}", "OK".green().bold(), target);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gdir_test_utils::TestRemote;
    use std::fs;
    use tempfile::TempDir;

    fn context_with_users_remote(temp: &TempDir, remote: &TestRemote) -> Context {
        let path = temp.path().join("gdir.toml");
        fs::write(
            &path,
            format!("secret = \"s\"\n\n[targets.users]\nurl = \"{}\"\n", remote.url()),
        )
        .unwrap();
        Context::load(&path, None).unwrap()
    }

    #[test]
    fn sync_without_targets_is_a_user_error() {
        let temp = TempDir::new().unwrap();
        let ctx = Context::load(&temp.path().join("gdir.toml"), None).unwrap();

        assert!(matches!(run_sync(&ctx, None), Err(CliError::User { .. })));
    }

    #[test]
    fn sync_publishes_new_records() {
        let temp = TempDir::new().unwrap();
        let remote = TestRemote::seeded(&[("README.md", "users")]);
        let ctx = context_with_users_remote(&temp, &remote);

        prepare(&ctx, Target::Users).unwrap();
        fs::write(ctx.target_dir(Target::Users).join("abc"), "sealed").unwrap();
        run_sync(&ctx, None).unwrap();

        assert_eq!(remote.paths(), vec!["README.md", "abc"]);
    }

    #[test]
    fn prepare_skips_unconfigured_targets() {
        let temp = TempDir::new().unwrap();
        let remote = TestRemote::seeded(&[("README.md", "users")]);
        let ctx = context_with_users_remote(&temp, &remote);

        prepare(&ctx, Target::Accounts).unwrap();

        assert!(!ctx.target_dir(Target::Accounts).exists());
    }
}
