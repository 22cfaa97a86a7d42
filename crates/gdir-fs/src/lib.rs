//! Filesystem primitives for gdir
//!
//! Owner-only atomic writes, reads that report a missing file as a distinct
//! [`Error::NotFound`], and format-agnostic configuration loading.

pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
