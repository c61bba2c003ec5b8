//! Notification settings session.

use std::sync::Arc;

use atende_core::{SettingsField, UserSettings};
use tokio::task::JoinHandle;

use crate::edit::{CommitOutcome, EditController, EditError};
use crate::remote::RemoteEntity;

/// Session for the agent's notification toggles.
///
/// Toggles have no edit step: the new value shows immediately and is saved
/// in the background. A failed save reloads every setting from the backend.
pub struct SettingsSession<R> {
    controller: EditController<UserSettings, R>,
}

impl<R> Clone for SettingsSession<R> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
        }
    }
}

impl<R: RemoteEntity<UserSettings>> SettingsSession<R> {
    /// Create a session and load the settings.
    pub async fn start(remote: Arc<R>) -> Self {
        let controller = EditController::new(remote);
        controller.initialize().await;
        Self { controller }
    }

    #[must_use]
    pub fn view(&self) -> UserSettings {
        *self.controller.snapshot().draft()
    }

    #[must_use]
    pub fn email_alerts(&self) -> bool {
        self.view().email_alert_on_new_message
    }

    /// Turn e-mail alerts for new messages on or off.
    ///
    /// The returned handle resolves once the background save settles; it
    /// may be dropped.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] if the settings are in an edit cycle.
    pub fn toggle_email_alerts(&self, enabled: bool) -> Result<JoinHandle<CommitOutcome>, EditError> {
        self.controller
            .toggle(SettingsField::EmailAlertOnNewMessage, enabled)
    }
}

impl<R> std::fmt::Debug for SettingsSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsSession")
            .field("controller", &self.controller)
            .finish()
    }
}
