//! Command implementations for gdir-cli

pub mod accounts;
pub mod acl;
pub mod secret;
pub mod sync;
pub mod user;

pub use accounts::{run_accounts_count, run_accounts_import};
pub use acl::run_acl;
pub use secret::run_secret_generate;
pub use sync::{run_push, run_sync};
pub use user::{run_user_add, run_user_edit, run_user_list, run_user_remove, run_user_rename};
