//! User command implementations

use colored::Colorize;
use gdir_acl::{AccessState, parse_drive_list};
use gdir_store::{RecordStore, User};

use super::sync::prepare;
use crate::cli::Target;
use crate::context::Context;
use crate::error::{CliError, Result};
use crate::interactive;

/// Trimmed user name; records are keyed by this form.
pub(super) fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::user("User name cannot be empty"));
    }
    Ok(name)
}

/// Load `name`, turning a missing record into a user-facing error.
fn load_existing(store: &RecordStore, name: &str) -> Result<User> {
    match store.load_user(name) {
        Ok(user) => Ok(user),
        Err(e) if e.is_not_found() => Err(CliError::user(format!(
            "User '{name}' does not exist. Add it with `gdir user add {name}`."
        ))),
        Err(e) => Err(e.into()),
    }
}

fn ensure_absent(store: &RecordStore, name: &str) -> Result<()> {
    match store.load_user(name) {
        Ok(_) => Err(CliError::user(format!("User '{name}' already exists"))),
        Err(e) if e.is_not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn permission(state: &AccessState) -> String {
    match state.kind() {
        None => "Full-Access (Admin)".to_string(),
        Some(kind) => format!("{kind}: {}", state.drives().join(",")),
    }
}

/// Run the user add command
pub fn run_user_add(
    ctx: &Context,
    name: &str,
    password: Option<String>,
    allow: Option<&str>,
    block: Option<&str>,
) -> Result<()> {
    let name = validate_name(name)?;
    let store = ctx.store()?;
    prepare(ctx, Target::Users)?;
    ensure_absent(&store, name)?;

    let first = !store.has_users()?;
    let password = match password {
        Some(password) => password,
        None => interactive::prompt_password("Password")?,
    };
    if password.is_empty() {
        return Err(CliError::user("Password cannot be empty"));
    }

    let access = AccessState::from_lists(
        allow.map(parse_drive_list).unwrap_or_default(),
        block.map(parse_drive_list).unwrap_or_default(),
    )?;
    if first && !access.is_unrestricted() {
        eprintln!(
            "{} the first user usually is the admin with full access",
            "warning:".yellow().bold()
        );
    }

    let user = User::new(name, password).with_access(access);
    store.save_user(&user)?;

    println!(
        "{} Added user {} ({})",
        "OK".green().bold(),
        name.cyan(),
        permission(&user.access()?)
    );
    Ok(())
}

/// Run the user edit command
///
/// Changes the password; access lists are edited with `gdir acl`.
pub fn run_user_edit(ctx: &Context, name: &str, password: Option<String>) -> Result<()> {
    let name = validate_name(name)?;
    let store = ctx.store()?;
    prepare(ctx, Target::Users)?;
    let mut user = load_existing(&store, name)?;

    user.password = match password {
        Some(password) => password,
        None => interactive::confirm_or_prompt_password(&user.password)?,
    };
    if user.password.is_empty() {
        return Err(CliError::user("Password cannot be empty"));
    }

    store.save_user(&user)?;
    println!("{} Updated user {}", "OK".green().bold(), name.cyan());
    Ok(())
}

/// Run the user list command
pub fn run_user_list(ctx: &Context) -> Result<()> {
    let users = ctx.store()?.list_users()?;
    if users.is_empty() {
        println!("No users.");
        return Ok(());
    }

    for (index, stored) in users.iter().enumerate() {
        let access = stored.user.access()?;
        println!("{}", format!("User #{}", index + 1).bold());
        println!("  {}: {}", "Username".dimmed(), stored.user.name.cyan());
        println!("  {}: {}", "Permission".dimmed(), permission(&access));
        println!("  {}: {}", "Filename".dimmed(), stored.file_name);
    }
    Ok(())
}

/// Run the user remove command
pub fn run_user_remove(ctx: &Context, name: &str) -> Result<()> {
    let name = validate_name(name)?;
    let store = ctx.store()?;
    prepare(ctx, Target::Users)?;

    if store.remove_user(name)? {
        println!("{} Removed user {}", "OK".green().bold(), name.cyan());
    } else {
        eprintln!(
            "{} User '{}' does not exist",
            "warning:".yellow().bold(),
            name
        );
    }
    Ok(())
}

/// Run the user rename command
pub fn run_user_rename(ctx: &Context, old: &str, new: &str) -> Result<()> {
    let old = validate_name(old)?;
    let new = validate_name(new)?;
    let store = ctx.store()?;
    prepare(ctx, Target::Users)?;

    let mut user = load_existing(&store, old)?;
    if old != new {
        ensure_absent(&store, new)?;
    }
    user.name = new.to_string();
    store.rename_user(old, &user)?;

    println!(
        "{} Renamed user {} to {}",
        "OK".green().bold(),
        old.cyan(),
        new.cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(dir: &Path) -> Context {
        std::fs::write(dir.join("gdir.toml"), "secret = \"s\"\n").unwrap();
        Context::load(&dir.join("gdir.toml"), None).unwrap()
    }

    #[test]
    fn add_then_load() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());

        run_user_add(&ctx, " bob ", Some("pw".into()), Some("d1, d2"), None).unwrap();

        let user = ctx.store().unwrap().load_user("bob").unwrap();
        assert_eq!(user.password, "pw");
        assert_eq!(user.allow_list, vec!["d1", "d2"]);
    }

    #[test]
    fn add_refuses_duplicates() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        run_user_add(&ctx, "bob", Some("pw".into()), None, None).unwrap();

        assert!(matches!(
            run_user_add(&ctx, "bob", Some("other".into()), None, None),
            Err(CliError::User { .. })
        ));
    }

    #[test]
    fn edit_missing_user_is_a_user_error() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());

        assert!(matches!(
            run_user_edit(&ctx, "ghost", Some("pw".into())),
            Err(CliError::User { .. })
        ));
    }

    #[test]
    fn rename_keeps_password_and_access() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        run_user_add(&ctx, "bob", Some("pw".into()), None, Some("d9")).unwrap();

        run_user_rename(&ctx, "bob", "robert").unwrap();

        let store = ctx.store().unwrap();
        assert!(store.load_user("bob").unwrap_err().is_not_found());
        let user = store.load_user("robert").unwrap();
        assert_eq!(user.password, "pw");
        assert_eq!(user.block_list, vec!["d9"]);
    }

    #[test]
    fn remove_missing_user_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());

        run_user_remove(&ctx, "ghost").unwrap();
    }

    #[rstest]
    #[case::padded(" bob ")]
    #[case::trailing_tab("bob\t")]
    fn remove_matches_the_trimmed_name(#[case] argument: &str) {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        run_user_add(&ctx, " bob ", Some("pw".into()), None, None).unwrap();

        run_user_remove(&ctx, argument).unwrap();

        assert!(ctx.store().unwrap().load_user("bob").unwrap_err().is_not_found());
    }

    #[test]
    fn edit_and_rename_match_the_trimmed_name() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());
        run_user_add(&ctx, "bob", Some("pw".into()), None, None).unwrap();

        run_user_edit(&ctx, " bob ", Some("new-pw".into())).unwrap();
        run_user_rename(&ctx, "bob ", " robert").unwrap();

        let store = ctx.store().unwrap();
        assert!(store.load_user("bob").unwrap_err().is_not_found());
        assert_eq!(store.load_user("robert").unwrap().password, "new-pw");
    }

    #[test]
    fn blank_name_is_rejected_everywhere() {
        let temp = TempDir::new().unwrap();
        let ctx = context(temp.path());

        assert!(matches!(run_user_remove(&ctx, "  "), Err(CliError::User { .. })));
        assert!(matches!(
            run_user_edit(&ctx, "", Some("pw".into())),
            Err(CliError::User { .. })
        ));
    }

    #[test]
    fn permission_wording() {
        assert_eq!(permission(&AccessState::Unrestricted), "Full-Access (Admin)");
        assert_eq!(
            permission(&AccessState::BlockList(vec!["d1".into(), "d2".into()])),
            "block-list: d1,d2"
        );
    }
}
