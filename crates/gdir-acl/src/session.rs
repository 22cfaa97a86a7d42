//! Multi-step editing sessions

use crate::{AccessState, AclError, Command, Result, apply};

/// Outcome of feeding one command to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The state changed (or not) and must be shown again for confirmation.
    Pending,
    /// The operator accepted the current state.
    Confirmed,
}

/// Drives an [`AccessState`] through operator commands until `Confirm`.
///
/// The session never persists anything; once [`AclSession::is_confirmed`]
/// returns `true`, the caller saves [`AclSession::into_state`].
#[derive(Debug, Clone)]
pub struct AclSession {
    original: AccessState,
    current: AccessState,
    confirmed: bool,
}

impl AclSession {
    pub fn new(state: AccessState) -> Self {
        Self {
            original: state.clone(),
            current: state,
            confirmed: false,
        }
    }

    /// The state as it should be displayed to the operator next.
    pub fn state(&self) -> &AccessState {
        &self.current
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Whether the confirmed state differs from the one the session started with.
    pub fn is_modified(&self) -> bool {
        self.current != self.original
    }

    /// Feed one command.
    ///
    /// A rejected command leaves the state untouched.
    pub fn step(&mut self, command: Command) -> Result<Step> {
        if self.confirmed {
            return Err(AclError::SessionClosed);
        }

        if command == Command::Confirm {
            self.confirmed = true;
            tracing::debug!(state = %self.current, "acl confirmed");
            return Ok(Step::Confirmed);
        }

        let name = command.name();
        self.current = apply(self.current.clone(), command)?;
        tracing::debug!(command = name, state = %self.current, "acl updated");
        Ok(Step::Pending)
    }

    /// Consume the session, returning the state reached.
    pub fn into_state(self) -> AccessState {
        self.current
    }
}
