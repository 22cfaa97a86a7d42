//! Access states and the transition function

use std::fmt;

use crate::{AclError, Result};

/// Which of the two mutually exclusive lists is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Only the listed drives are visible.
    Allow,
    /// Every drive except the listed ones is visible.
    Block,
}

impl ListKind {
    pub fn opposite(self) -> Self {
        match self {
            Self::Allow => Self::Block,
            Self::Block => Self::Allow,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow-list",
            Self::Block => "block-list",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access-control state of one user.
///
/// At most one list can be active, so the "allow-list and block-list never
/// both non-empty" rule holds by construction. An active list is never
/// empty: [`apply`] collapses an emptied list to [`AccessState::Unrestricted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccessState {
    #[default]
    Unrestricted,
    AllowList(Vec<String>),
    BlockList(Vec<String>),
}

impl AccessState {
    /// Build a state from the two persisted lists.
    pub fn from_lists(allow: Vec<String>, block: Vec<String>) -> Result<Self> {
        match (allow.is_empty(), block.is_empty()) {
            (true, true) => Ok(Self::Unrestricted),
            (false, true) => Ok(Self::AllowList(allow)),
            (true, false) => Ok(Self::BlockList(block)),
            (false, false) => Err(AclError::ConflictingLists {
                allow: allow.len(),
                block: block.len(),
            }),
        }
    }

    /// Split back into `(allow, block)` for persistence.
    pub fn into_lists(self) -> (Vec<String>, Vec<String>) {
        match self {
            Self::Unrestricted => (Vec::new(), Vec::new()),
            Self::AllowList(drives) => (drives, Vec::new()),
            Self::BlockList(drives) => (Vec::new(), drives),
        }
    }

    fn with_kind(kind: ListKind, drives: Vec<String>) -> Self {
        if drives.is_empty() {
            return Self::Unrestricted;
        }
        match kind {
            ListKind::Allow => Self::AllowList(drives),
            ListKind::Block => Self::BlockList(drives),
        }
    }

    /// The active list kind, or `None` when unrestricted.
    pub fn kind(&self) -> Option<ListKind> {
        match self {
            Self::Unrestricted => None,
            Self::AllowList(_) => Some(ListKind::Allow),
            Self::BlockList(_) => Some(ListKind::Block),
        }
    }

    /// The active list in display order (empty when unrestricted).
    pub fn drives(&self) -> &[String] {
        match self {
            Self::Unrestricted => &[],
            Self::AllowList(drives) | Self::BlockList(drives) => drives,
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }
}

impl fmt::Display for AccessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            None => f.write_str("unrestricted"),
            Some(kind) => write!(f, "{} [{}]", kind, self.drives().join(",")),
        }
    }
}

/// One operator decision about a user's access-control list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Accept the current state as final.
    Confirm,
    /// Add drives to the active list, skipping ones already present.
    Append(Vec<String>),
    /// Drop entries by 1-based position in the list as last displayed.
    Remove(Vec<usize>),
    /// Overwrite the active list.
    Replace(Vec<String>),
    /// Move the active list to the opposite kind.
    Convert,
    /// Clear all access control.
    Disable,
    /// Start restricting an unrestricted user.
    Promote(ListKind, Vec<String>),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Append(_) => "append",
            Self::Remove(_) => "remove",
            Self::Replace(_) => "replace",
            Self::Convert => "convert",
            Self::Disable => "disable",
            Self::Promote(..) => "promote",
        }
    }
}

/// Apply one command to a state.
///
/// Drive ids are trimmed on the way in. `Append`, `Remove`, `Replace` and
/// `Convert` need an active list; `Promote` needs an unrestricted user.
pub fn apply(state: AccessState, command: Command) -> Result<AccessState> {
    let invalid = |state: &AccessState, command: &Command| AclError::InvalidTransition {
        command: command.name(),
        state: state.to_string(),
    };

    let next = match (state, command) {
        (state, Command::Confirm) => state,

        (_, Command::Disable) => AccessState::Unrestricted,

        (AccessState::Unrestricted, Command::Promote(kind, drives)) => {
            AccessState::with_kind(kind, trimmed(drives))
        }

        (state @ AccessState::Unrestricted, command) => return Err(invalid(&state, &command)),

        (state, command @ Command::Promote(..)) => return Err(invalid(&state, &command)),

        (state, Command::Append(drives)) => {
            let kind = active_kind(&state);
            let mut current = take_drives(state);
            for drive in trimmed(drives) {
                if !current.contains(&drive) {
                    current.push(drive);
                }
            }
            AccessState::with_kind(kind, current)
        }

        (state, Command::Remove(positions)) => {
            let kind = active_kind(&state);
            let current = take_drives(state);
            let kept = current
                .into_iter()
                .enumerate()
                .filter(|(i, _)| !positions.contains(&(i + 1)))
                .map(|(_, drive)| drive)
                .collect();
            AccessState::with_kind(kind, kept)
        }

        (state, Command::Replace(drives)) => {
            AccessState::with_kind(active_kind(&state), trimmed(drives))
        }

        (state, Command::Convert) => {
            let kind = active_kind(&state);
            // Source is consumed before the destination is built
            let moved = take_drives(state);
            AccessState::with_kind(kind.opposite(), moved)
        }
    };

    tracing::trace!(state = %next, "acl transition applied");
    Ok(next)
}

fn active_kind(state: &AccessState) -> ListKind {
    state.kind().unwrap_or(ListKind::Allow)
}

fn take_drives(state: AccessState) -> Vec<String> {
    match state {
        AccessState::Unrestricted => Vec::new(),
        AccessState::AllowList(drives) | AccessState::BlockList(drives) => drives,
    }
}

fn trimmed(drives: Vec<String>) -> Vec<String> {
    drives.into_iter().map(|d| d.trim().to_string()).collect()
}
