//! Shared test utilities for the gdir workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: bare remotes and direct commits built with `git2`
//! - [`remote`]: [`TestRemote`] scratch area with a remote and working copies

pub mod git;
pub mod remote;

pub use remote::TestRemote;
