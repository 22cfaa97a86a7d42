//! Git plumbing for gdir distribution targets
//!
//! Each target (accounts, users, static) is a local working copy of one
//! remote snippet repository. [`reconcile`] brings a directory into a known
//! state as a checkout of that remote; [`deploy`] publishes whatever changed
//! in it with a single commit and a force-push of `master`.
//!
//! Single branch, single remote, last writer wins.

pub mod deploy;
pub mod error;
pub mod reconcile;
pub mod remote;

pub use deploy::{DeployReport, deploy, push};
pub use error::{Error, Result};
pub use reconcile::{Change, ReconcileReport, reconcile};
pub use remote::{Credentials, gist_remote_url, parse_gist_id, redact_url};

/// Remote every working copy publishes to
pub const REMOTE_NAME: &str = "origin";

/// The only branch that is ever published
pub const BRANCH: &str = "master";

/// Author and committer of every deploy commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub name: &'static str,
    pub email: &'static str,
}

pub const DEPLOY_IDENTITY: Identity = Identity {
    name: "gdir",
    email: "gdir@mail.com",
};
