//! Access-control command implementation

use colored::Colorize;

use super::sync::prepare;
use super::user::validate_name;
use crate::cli::Target;
use crate::context::Context;
use crate::error::{CliError, Result};
use crate::interactive;

/// Run the acl command
///
/// Loads the user, runs the interactive editing loop and saves only if the
/// confirmed state differs from the stored one.
pub fn run_acl(ctx: &Context, name: &str) -> Result<()> {
    let name = validate_name(name)?;
    let store = ctx.store()?;
    prepare(ctx, Target::Users)?;

    let mut user = match store.load_user(name) {
        Ok(user) => user,
        Err(e) if e.is_not_found() => {
            return Err(CliError::user(format!(
                "User '{name}' does not exist. Add it with `gdir user add {name}`."
            )));
        }
        Err(e) => return Err(e.into()),
    };

    let current = user.access()?;
    let edited = interactive::edit_access(name, current.clone())?;

    if edited == current {
        println!("{} Access for {} unchanged", "OK".green().bold(), name.cyan());
        return Ok(());
    }

    user.set_access(edited);
    store.save_user(&user)?;
    println!(
        "{} Saved access for {}. Run {} to publish.",
        "OK".green().bold(),
        name.cyan(),
        "gdir sync users".cyan()
    );
    Ok(())
}
