//! Secret command implementations

use colored::Colorize;
use gdir_store::SecretKey;

use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the secret generate command
///
/// Stores a fresh random secret in the configuration file. Refuses to
/// replace an existing one unless `force` is set, since every record sealed
/// with the old secret becomes unreadable.
pub fn run_secret_generate(ctx: &mut Context, force: bool) -> Result<()> {
    if ctx.settings.secret.is_some() && !force {
        return Err(CliError::user(
            "A secret is already configured. Use --force to replace it; records sealed with the old secret will no longer open.",
        ));
    }

    let (_key, printable) = SecretKey::generate();
    ctx.settings.secret = Some(printable);
    ctx.save()?;
    tracing::info!(config = %ctx.config_path().display(), "generated new secret");

    println!(
        "{} Generated a new secret in {}",
        "OK".green().bold(),
        ctx.config_path().display().to_string().cyan()
    );

    if ctx.has_secret_override() {
        eprintln!(
            "{} GDIR_SECRET / --secret is set and still overrides the stored secret",
            "warning:".yellow().bold()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generate_stores_secret() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gdir.toml");
        let mut ctx = Context::load(&path, None).unwrap();

        run_secret_generate(&mut ctx, false).unwrap();

        let reloaded = Context::load(&path, None).unwrap();
        let secret = reloaded.settings.secret.unwrap();
        assert_eq!(secret.len(), 128);
    }

    #[test]
    fn generate_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("gdir.toml");
        let mut ctx = Context::load(&path, None).unwrap();
        ctx.settings.secret = Some("existing".into());

        assert!(matches!(
            run_secret_generate(&mut ctx, false),
            Err(CliError::User { .. })
        ));
        assert_eq!(ctx.settings.secret.as_deref(), Some("existing"));

        run_secret_generate(&mut ctx, true).unwrap();
        assert_ne!(ctx.settings.secret.as_deref(), Some("existing"));
    }
}
