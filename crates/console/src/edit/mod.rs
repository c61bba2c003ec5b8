//! Optimistic editing of remotely owned records.
//!
//! Split in two layers:
//!
//! - [`EditSession`] is a plain value with pure transitions
//!   (`start_editing`, `update_field`, `begin_commit`, `reconcile`, ...).
//! - [`EditController`] binds a session to a [`RemoteEntity`] and runs the
//!   async parts: the commit itself and the re-fetch that follows a cancel or
//!   a failed write.
//!
//! [`RemoteEntity`]: crate::remote::RemoteEntity

pub mod controller;
pub mod session;

use core::fmt;

use atende_core::{ProfileField, SettingsField, UserProfile, UserSettings};

pub use controller::{CommitOutcome, EditController};
pub use session::{EditError, EditMode, EditSession, Reconciliation};

/// A record that can sit in an edit session.
///
/// `Default` is the "nothing on the server" value used when a fetch comes
/// back empty or fails.
pub trait Editable: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Identifies one editable field.
    type Field: Copy + fmt::Debug + Send + 'static;
    /// What a field holds.
    type Value: Send + 'static;

    /// Name used in log lines.
    const ENTITY: &'static str;

    /// Overwrite one field.
    fn set_field(&mut self, field: Self::Field, value: Self::Value);
}

impl Editable for UserProfile {
    type Field = ProfileField;
    type Value = String;

    const ENTITY: &'static str = "profile";

    fn set_field(&mut self, field: ProfileField, value: String) {
        self.set(field, value);
    }
}

impl Editable for UserSettings {
    type Field = SettingsField;
    type Value = bool;

    const ENTITY: &'static str = "settings";

    fn set_field(&mut self, field: SettingsField, value: bool) {
        self.set(field, value);
    }
}
