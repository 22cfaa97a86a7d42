//! Service-account command implementations

use std::path::Path;

use colored::Colorize;

use super::sync::prepare;
use crate::cli::Target;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the accounts import command
///
/// Encrypts every key file in `source` (or the configured directory) into
/// `accounts/` and records the count in the settings.
pub fn run_accounts_import(ctx: &mut Context, source: Option<&Path>, force: bool) -> Result<()> {
    let count = ctx.settings.account_count;
    if count > 0 && !force {
        return Err(CliError::user(format!(
            "{count} accounts are already imported. Use --force to re-scan."
        )));
    }

    // A path given on the command line is relative to the working directory
    let (stored, resolved) = match source {
        Some(path) => {
            let absolute = std::path::absolute(path)?;
            (absolute.clone(), absolute)
        }
        None => {
            let configured = ctx.settings.accounts_source.clone().ok_or_else(|| {
                CliError::user("No accounts directory given or configured.")
            })?;
            let resolved = ctx.resolve(&configured);
            (configured, resolved)
        }
    };

    let store = ctx.store()?;
    prepare(ctx, Target::Accounts)?;

    println!(
        "{} Encrypting accounts from {}...",
        "=>".blue().bold(),
        resolved.display().to_string().cyan()
    );
    let imported = store.import_accounts(&resolved)?;

    ctx.settings.account_count = imported;
    ctx.settings.accounts_source = Some(stored);
    ctx.save()?;

    if imported == 0 {
        eprintln!(
            "{} No non-empty *.json files found in {}",
            "warning:".yellow().bold(),
            resolved.display()
        );
    } else {
        println!("{} Imported {} accounts", "OK".green().bold(), imported);
    }
    Ok(())
}

/// Run the accounts count command
pub fn run_accounts_count(ctx: &Context) -> Result<()> {
    let on_disk = ctx.store()?.count_accounts()?;
    println!("{on_disk}");

    let recorded = ctx.settings.account_count;
    if recorded != on_disk {
        eprintln!(
            "{} configuration records {} accounts but {} are on disk",
            "warning:".yellow().bold(),
            recorded,
            on_disk
        );
    }
    Ok(())
}
