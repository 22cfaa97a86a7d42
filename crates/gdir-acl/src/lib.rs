//! Drive access-control lists for gdir users
//!
//! A user is either unrestricted, restricted to an allow-list of drives, or
//! excluded from a block-list of drives. [`apply`] is a pure transition over
//! [`AccessState`]; [`AclSession`] strings transitions together until the
//! operator confirms. Nothing here touches the disk.

pub mod error;
pub mod input;
pub mod session;
pub mod state;

pub use error::{AclError, Result};
pub use input::{parse_drive_list, parse_indices};
pub use session::{AclSession, Step};
pub use state::{AccessState, Command, ListKind, apply};
