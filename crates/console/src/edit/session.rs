//! The edit session value and its transitions.

use thiserror::Error;

use super::Editable;

/// Where a session is in its edit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditMode {
    /// Showing confirmed state; `draft == committed`.
    #[default]
    Viewing,
    /// The agent is changing `draft`.
    Editing,
    /// `draft` has been sent and the write has not resolved yet.
    Committing,
}

impl std::fmt::Display for EditMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Viewing => write!(f, "viewing"),
            Self::Editing => write!(f, "editing"),
            Self::Committing => write!(f, "committing"),
        }
    }
}

/// A transition was requested from a mode that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// The session is not in the mode the operation needs.
    #[error("cannot {operation} while {mode}")]
    InvalidTransition {
        operation: &'static str,
        mode: EditMode,
    },
    /// A commit is already in flight for this session.
    #[error("a commit is already in flight")]
    CommitInFlight,
}

/// How an edit cycle resolved.
///
/// Both variants end in [`EditMode::Viewing`] with both slots set to the
/// carried value; they differ only in where that value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation<T> {
    /// The remote accepted the write and answered with this value.
    Confirmed(T),
    /// The draft was dropped and this is a fresh read of remote truth.
    Refetched(T),
}

impl<T> Reconciliation<T> {
    fn into_value(self) -> T {
        match self {
            Self::Confirmed(value) | Self::Refetched(value) => value,
        }
    }
}

/// Committed and draft copies of one record plus the current mode.
///
/// Transitions borrow the session and return the next one, leaving the
/// original untouched when they are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession<T> {
    committed: T,
    draft: T,
    mode: EditMode,
}

impl<T: Editable> Default for EditSession<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Editable> EditSession<T> {
    /// A viewing session over a known value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            draft: value.clone(),
            committed: value,
            mode: EditMode::Viewing,
        }
    }

    /// Last value confirmed by (or fetched from) the remote.
    #[must_use]
    pub const fn committed(&self) -> &T {
        &self.committed
    }

    /// The value the agent sees and edits.
    #[must_use]
    pub const fn draft(&self) -> &T {
        &self.draft
    }

    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    /// Viewing → Editing.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidTransition`] unless the session is viewing.
    pub fn start_editing(&self) -> Result<Self, EditError> {
        self.require(EditMode::Viewing, "start editing")?;
        Ok(Self {
            mode: EditMode::Editing,
            ..self.clone()
        })
    }

    /// Change one field of the draft. `committed` is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidTransition`] unless the session is editing.
    pub fn update_field(&self, field: T::Field, value: T::Value) -> Result<Self, EditError> {
        self.require(EditMode::Editing, "update a field")?;
        let mut next = self.clone();
        next.draft.set_field(field, value);
        Ok(next)
    }

    /// Editing → Viewing, dropping the draft in favour of the last committed
    /// value. The cancel finishes through [`EditSession::reconcile`] once
    /// remote truth has been re-read.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidTransition`] unless the session is editing.
    pub fn begin_cancel(&self) -> Result<Self, EditError> {
        self.require(EditMode::Editing, "cancel")?;
        Ok(Self::new(self.committed.clone()))
    }

    /// Editing → Committing. The draft is the payload to send.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::CommitInFlight`] if a commit is already pending,
    /// or [`EditError::InvalidTransition`] when viewing.
    pub fn begin_commit(&self) -> Result<Self, EditError> {
        if self.mode == EditMode::Committing {
            return Err(EditError::CommitInFlight);
        }
        self.require(EditMode::Editing, "commit")?;
        Ok(Self {
            mode: EditMode::Committing,
            ..self.clone()
        })
    }

    /// Optimistically set a field while viewing.
    ///
    /// Both slots take the new value at once so the viewing invariant holds;
    /// a failed write later reverts them through a re-fetch.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidTransition`] unless the session is viewing.
    pub fn apply_optimistic(&self, field: T::Field, value: T::Value) -> Result<Self, EditError> {
        self.require(EditMode::Viewing, "toggle a field")?;
        let mut next = self.draft.clone();
        next.set_field(field, value);
        Ok(Self::new(next))
    }

    /// Settle the session on a value from the remote. Always ends viewing.
    #[must_use]
    pub fn reconcile(&self, outcome: Reconciliation<T>) -> Self {
        Self::new(outcome.into_value())
    }

    fn require(&self, expected: EditMode, operation: &'static str) -> Result<(), EditError> {
        if self.mode == expected {
            Ok(())
        } else {
            Err(EditError::InvalidTransition {
                operation,
                mode: self.mode,
            })
        }
    }
}
