//! Profile form session.

use std::sync::Arc;

use atende_core::{ProfileField, UserProfile};

use crate::edit::{CommitOutcome, EditController, EditError, EditMode};
use crate::remote::RemoteEntity;

/// Edit session for the agent's profile.
///
/// `email` is shown but never editable; only display name, full name and
/// photo URL go through [`ProfileSession::save`].
pub struct ProfileSession<R> {
    controller: EditController<UserProfile, R>,
}

impl<R> Clone for ProfileSession<R> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<R: RemoteEntity<UserProfile>> ProfileSession<R> {
    /// Create a session and load the profile.
    pub async fn start(remote: Arc<R>) -> Self {
        let controller = EditController::new(remote);
        controller.initialize().await;
        Self { controller }
    }

    /// The profile as the form shows it: the draft while editing, the
    /// confirmed value otherwise.
    #[must_use]
    pub fn view(&self) -> UserProfile {
        self.controller.snapshot().draft().clone()
    }

    /// Last value confirmed by the backend.
    #[must_use]
    pub fn committed(&self) -> UserProfile {
        self.controller.snapshot().committed().clone()
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.controller.snapshot().mode()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.mode() != EditMode::Viewing
    }

    /// # Errors
    ///
    /// Returns [`EditError`] if the form is already being edited.
    pub fn start_editing(&self) -> Result<(), EditError> {
        self.controller.start_editing()
    }

    /// # Errors
    ///
    /// Returns [`EditError`] unless the form is being edited.
    pub fn set_display_name(&self, value: impl Into<String>) -> Result<(), EditError> {
        self.controller
            .update_field(ProfileField::DisplayName, value.into())
    }

    /// # Errors
    ///
    /// Returns [`EditError`] unless the form is being edited.
    pub fn set_full_name(&self, value: impl Into<String>) -> Result<(), EditError> {
        self.controller.update_field(ProfileField::FullName, value.into())
    }

    /// # Errors
    ///
    /// Returns [`EditError`] unless the form is being edited.
    pub fn set_profile_photo_url(&self, value: impl Into<String>) -> Result<(), EditError> {
        self.controller
            .update_field(ProfileField::ProfilePhotoUrl, value.into())
    }

    /// Discard the draft and reload the profile.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] unless the form is being edited.
    pub async fn cancel(&self) -> Result<(), EditError> {
        self.controller.cancel().await
    }

    /// Save the draft.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] unless the form is being edited, or if a save
    /// is already running.
    pub async fn save(&self) -> Result<CommitOutcome, EditError> {
        self.controller.commit().await
    }
}

impl<R> std::fmt::Debug for ProfileSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSession")
            .field("controller", &self.controller)
            .finish()
    }
}
