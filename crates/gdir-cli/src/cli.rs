//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// gdir - Manage the encrypted records and gist targets of a gdir deployment
#[derive(Parser, Debug)]
#[command(name = "gdir")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (JSON or TOML)
    #[arg(
        short,
        long,
        global = true,
        env = "GDIR_CONFIG",
        default_value = "gdir.toml"
    )]
    pub config: PathBuf,

    /// Master secret, overriding the one in the configuration file
    #[arg(long, global = true, env = "GDIR_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage the master secret
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Import and inspect service accounts
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Interactively edit a user's drive access-control list
    Acl {
        /// Name of the user
        name: String,
    },

    /// Reconcile working copies with their remotes and publish changes
    ///
    /// Examples:
    ///   gdir sync            # All configured targets
    ///   gdir sync users      # Only the users gist
    Sync {
        /// Target to sync (all configured targets if omitted)
        #[arg(value_enum)]
        target: Option<Target>,
    },

    /// Re-publish already committed changes without committing
    Push {
        /// Target to push (all configured targets if omitted)
        #[arg(value_enum)]
        target: Option<Target>,
    },
}

/// Secret subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SecretAction {
    /// Generate a random secret and store it in the configuration file
    Generate {
        /// Replace an existing secret (existing records become unreadable)
        #[arg(long)]
        force: bool,
    },
}

/// Accounts subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum AccountsAction {
    /// Encrypt every service-account JSON file in a directory
    Import {
        /// Directory of key files (defaults to the configured one)
        source: Option<PathBuf>,

        /// Re-scan even if accounts were imported before
        #[arg(long)]
        force: bool,
    },

    /// Show how many accounts are imported
    Count,
}

/// User subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// Add a user
    Add {
        /// Name of the user
        name: String,

        /// Password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,

        /// Restrict the user to these drives (comma separated)
        #[arg(long, conflicts_with = "block")]
        allow: Option<String>,

        /// Hide these drives from the user (comma separated)
        #[arg(long)]
        block: Option<String>,
    },

    /// Change a user's password
    Edit {
        /// Name of the user
        name: String,

        /// New password (prompted for if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// List all users
    List,

    /// Remove a user
    Remove {
        /// Name of the user
        name: String,
    },

    /// Rename a user, keeping password and access list
    Rename {
        /// Current name
        old: String,

        /// New name
        new: String,
    },
}

/// Distribution targets, one gist each
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    Accounts,
    Users,
    Static,
}

impl Target {
    pub const ALL: [Target; 3] = [Target::Accounts, Target::Users, Target::Static];

    /// Directory name under the data directory
    pub fn dir_name(self) -> &'static str {
        match self {
            Target::Accounts => "accounts",
            Target::Users => "users",
            Target::Static => "static",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_sync_target() {
        let cli = Cli::try_parse_from(["gdir", "sync", "users"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Sync {
                target: Some(Target::Users)
            })
        );
    }

    #[test]
    fn parse_user_add_with_lists() {
        let cli =
            Cli::try_parse_from(["gdir", "user", "add", "bob", "--password", "pw", "--allow", "d1,d2"])
                .unwrap();
        match cli.command {
            Some(Commands::User {
                action: UserAction::Add { name, allow, .. },
            }) => {
                assert_eq!(name, "bob");
                assert_eq!(allow.as_deref(), Some("d1,d2"));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn allow_and_block_conflict() {
        let result = Cli::try_parse_from([
            "gdir", "user", "add", "bob", "--allow", "d1", "--block", "d2",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn target_dir_names_match_store_layout() {
        assert_eq!(Target::Users.dir_name(), gdir_store::store::USERS_DIR);
        assert_eq!(Target::Accounts.dir_name(), gdir_store::store::ACCOUNTS_DIR);
    }
}
