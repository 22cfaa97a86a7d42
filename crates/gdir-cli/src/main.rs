//! gdir CLI
//!
//! Operator tool for a gdir deployment: seals users and service accounts
//! with the master secret and publishes them to their gists.

mod cli;
mod commands;
mod context;
mod error;
mod interactive;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{AccountsAction, Cli, Commands, SecretAction, UserAction};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{} failed to initialise logging: {e}", "warning:".yellow().bold());
    }
    tracing::debug!(config = %cli.config.display(), "starting");

    let Some(command) = cli.command else {
        println!("{} file-index operator CLI", "gdir".green().bold());
        println!();
        println!("Run {} for available commands.", "gdir --help".cyan());
        return Ok(());
    };

    let mut ctx = Context::load(&cli.config, cli.secret)?;
    execute_command(&mut ctx, command)
}

fn execute_command(ctx: &mut Context, command: Commands) -> Result<()> {
    match command {
        Commands::Secret {
            action: SecretAction::Generate { force },
        } => commands::run_secret_generate(ctx, force),
        Commands::Accounts { action } => match action {
            AccountsAction::Import { source, force } => {
                commands::run_accounts_import(ctx, source.as_deref(), force)
            }
            AccountsAction::Count => commands::run_accounts_count(ctx),
        },
        Commands::User { action } => match action {
            UserAction::Add {
                name,
                password,
                allow,
                block,
            } => commands::run_user_add(ctx, &name, password, allow.as_deref(), block.as_deref()),
            UserAction::Edit { name, password } => commands::run_user_edit(ctx, &name, password),
            UserAction::List => commands::run_user_list(ctx),
            UserAction::Remove { name } => commands::run_user_remove(ctx, &name),
            UserAction::Rename { old, new } => commands::run_user_rename(ctx, &old, &new),
        },
        Commands::Acl { name } => commands::run_acl(ctx, &name),
        Commands::Sync { target } => commands::run_sync(ctx, target),
        Commands::Push { target } => commands::run_push(ctx, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_error_user() {
        let error = crate::error::CliError::user("test error");
        assert_eq!(format!("{}", error), "test error");
    }

    #[test]
    fn test_execute_user_add_and_list() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("gdir.json");
        let mut ctx = Context::load(&config, Some("secret".into())).unwrap();

        execute_command(
            &mut ctx,
            Commands::User {
                action: UserAction::Add {
                    name: "alice".into(),
                    password: Some("pw".into()),
                    allow: None,
                    block: None,
                },
            },
        )
        .unwrap();

        execute_command(
            &mut ctx,
            Commands::User {
                action: UserAction::List,
            },
        )
        .unwrap();
    }
}
