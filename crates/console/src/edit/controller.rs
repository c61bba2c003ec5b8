//! Async driver for an [`EditSession`].

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument, warn};

use super::{EditError, EditSession, Editable, Reconciliation};
use crate::remote::RemoteEntity;

/// How a commit (or a background toggle write) resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The remote accepted the write.
    Confirmed,
    /// The write failed and the session was re-synced from the remote.
    Reverted,
}

#[derive(Debug)]
struct Shared<T> {
    session: EditSession<T>,
    ready: bool,
    /// Resolves when the most recently queued write has finished.
    last_write: Option<oneshot::Receiver<()>>,
}

impl<T> Shared<T> {
    /// Queue a write behind the previous one. The returned sender must be
    /// held until the write, including any re-sync, is done.
    fn queue_write(&mut self) -> (Option<oneshot::Receiver<()>>, oneshot::Sender<()>) {
        let (done, next) = oneshot::channel();
        (self.last_write.replace(next), done)
    }
}

/// Wait for the write queued ahead of this one.
async fn after(previous: Option<oneshot::Receiver<()>>) {
    if let Some(previous) = previous {
        // A dropped sender means the earlier write finished or was aborted.
        let _ = previous.await;
    }
}

/// Holds one [`EditSession`] and runs its remote calls.
///
/// Cloning is cheap and every clone drives the same session. The session
/// lock is never held across an `.await`: a remote call works on a copy of
/// the draft and the result is written back when it resolves. Writes reach
/// the remote one at a time in the order they were made. Re-fetches are not
/// cancelled, so the last one to resolve wins.
pub struct EditController<T, R> {
    shared: Arc<Mutex<Shared<T>>>,
    remote: Arc<R>,
}

impl<T, R> Clone for EditController<T, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            remote: Arc::clone(&self.remote),
        }
    }
}

impl<T: Editable, R: RemoteEntity<T>> EditController<T, R> {
    /// A controller over an empty viewing session. Call
    /// [`EditController::initialize`] before showing it.
    #[must_use]
    pub fn new(remote: Arc<R>) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                session: EditSession::default(),
                ready: false,
                last_write: None,
            })),
            remote,
        }
    }

    /// Load the record from the remote and mark the controller ready.
    ///
    /// A missing record or a failed read leaves the default value in place.
    #[instrument(skip(self), fields(entity = T::ENTITY))]
    pub async fn initialize(&self) -> T {
        let value = self.fetch_or_default().await;
        let mut shared = self.lock();
        shared.session = EditSession::new(value.clone());
        shared.ready = true;
        value
    }

    /// A copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> EditSession<T> {
        self.lock().session.clone()
    }

    /// Whether [`EditController::initialize`] has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.lock().ready
    }

    /// # Errors
    ///
    /// Returns [`EditError`] unless the session is viewing.
    pub fn start_editing(&self) -> Result<(), EditError> {
        self.transition(EditSession::start_editing)
    }

    /// # Errors
    ///
    /// Returns [`EditError`] unless the session is editing.
    pub fn update_field(&self, field: T::Field, value: T::Value) -> Result<(), EditError> {
        self.transition(|session| session.update_field(field, value))
    }

    /// Drop the draft and re-read both slots from the remote.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] unless the session is editing.
    #[instrument(skip(self), fields(entity = T::ENTITY))]
    pub async fn cancel(&self) -> Result<(), EditError> {
        self.transition(EditSession::begin_cancel)?;
        self.resync().await;
        Ok(())
    }

    /// Send the draft. On success the remote's answer becomes the committed
    /// value; on failure the session re-syncs as [`EditController::cancel`]
    /// would.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::CommitInFlight`] while another commit is pending
    /// and [`EditError::InvalidTransition`] when not editing.
    #[instrument(skip(self), fields(entity = T::ENTITY))]
    pub async fn commit(&self) -> Result<CommitOutcome, EditError> {
        let (draft, previous, _done) = {
            let mut shared = self.lock();
            let next = shared.session.begin_commit()?;
            let draft = next.draft().clone();
            shared.session = next;
            let (previous, done) = shared.queue_write();
            (draft, previous, done)
        };

        after(previous).await;
        match self.remote.update(&draft).await {
            Ok(saved) => {
                let mut shared = self.lock();
                shared.session = shared.session.reconcile(Reconciliation::Confirmed(saved));
                debug!("Commit confirmed");
                Ok(CommitOutcome::Confirmed)
            }
            Err(e) => {
                error!(error = %e, "Commit failed, re-syncing from remote");
                self.resync().await;
                Ok(CommitOutcome::Reverted)
            }
        }
    }

    /// Flip a field at once and write it in the background.
    ///
    /// The new value is visible as soon as this returns. A successful write
    /// changes nothing further; a failed one re-syncs the whole record.
    /// Rapid toggles queue up, so the remote ends on the last value sent.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] unless the session is viewing.
    pub fn toggle(
        &self,
        field: T::Field,
        value: T::Value,
    ) -> Result<JoinHandle<CommitOutcome>, EditError> {
        let (draft, previous, done) = {
            let mut shared = self.lock();
            let next = shared.session.apply_optimistic(field, value)?;
            let draft = next.draft().clone();
            shared.session = next;
            let (previous, done) = shared.queue_write();
            (draft, previous, done)
        };

        let controller = self.clone();
        Ok(tokio::spawn(async move {
            let _done = done;
            after(previous).await;
            match controller.remote.update(&draft).await {
                Ok(_) => {
                    debug!(entity = T::ENTITY, "Toggle confirmed");
                    CommitOutcome::Confirmed
                }
                Err(e) => {
                    error!(entity = T::ENTITY, error = %e, "Toggle failed, re-syncing from remote");
                    controller.resync().await;
                    CommitOutcome::Reverted
                }
            }
        }))
    }

    async fn resync(&self) {
        let value = self.fetch_or_default().await;
        let mut shared = self.lock();
        shared.session = shared.session.reconcile(Reconciliation::Refetched(value));
    }

    async fn fetch_or_default(&self) -> T {
        match self.remote.fetch().await {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!(entity = T::ENTITY, "Remote has no record, using defaults");
                T::default()
            }
            Err(e) => {
                warn!(entity = T::ENTITY, error = %e, "Fetch failed, using defaults");
                T::default()
            }
        }
    }

    fn transition(
        &self,
        step: impl FnOnce(&EditSession<T>) -> Result<EditSession<T>, EditError>,
    ) -> Result<(), EditError> {
        let mut shared = self.lock();
        shared.session = step(&shared.session)?;
        Ok(())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared<T>> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: std::fmt::Debug, R> std::fmt::Debug for EditController<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditController")
            .field("shared", &self.shared)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atende_core::{ProfileField, SettingsField, UserProfile, UserSettings};

    use super::*;
    use crate::edit::EditMode;
    use crate::remote::fake::FakeRemote;

    fn profile(full_name: &str) -> UserProfile {
        UserProfile {
            email: "ana@example.com".to_string(),
            display_name: "ana".to_string(),
            full_name: full_name.to_string(),
            profile_photo_url: String::new(),
        }
    }

    async fn profile_controller(
        stored: Option<UserProfile>,
    ) -> (
        EditController<UserProfile, FakeRemote<UserProfile>>,
        Arc<FakeRemote<UserProfile>>,
    ) {
        let remote = Arc::new(FakeRemote::new(stored));
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        (controller, remote)
    }

    #[tokio::test]
    async fn test_initialize_marks_ready() {
        let remote = Arc::new(FakeRemote::new(Some(profile("Ana"))));
        let controller = EditController::new(Arc::clone(&remote));
        assert!(!controller.is_ready());

        let loaded = controller.initialize().await;
        assert_eq!(loaded.full_name, "Ana");
        assert!(controller.is_ready());
        assert_eq!(controller.snapshot().committed().full_name, "Ana");
        assert_eq!(controller.snapshot().mode(), EditMode::Viewing);
    }

    #[tokio::test]
    async fn test_initialize_with_no_record_uses_defaults() {
        let (controller, _) = profile_controller(None).await;
        assert_eq!(controller.snapshot().committed(), &UserProfile::default());
        assert!(controller.is_ready());
    }

    #[tokio::test]
    async fn test_initialize_fetch_failure_uses_defaults() {
        let remote = Arc::new(FakeRemote::new(Some(profile("Ana"))));
        remote.set_fail_fetch(true);
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        assert_eq!(controller.snapshot().draft(), &UserProfile::default());
    }

    #[tokio::test]
    async fn test_cancel_refetches_instead_of_restoring_local() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;

        controller.start_editing().unwrap();
        controller
            .update_field(ProfileField::FullName, "Draft Name".to_string())
            .unwrap();

        // Changed out-of-band while editing
        remote.set_stored(Some(profile("Ana Maria")));

        controller.cancel().await.unwrap();
        let session = controller.snapshot();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.committed().full_name, "Ana Maria");
        assert_eq!(session.draft(), session.committed());
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_cancel_requires_editing() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;
        assert!(controller.cancel().await.is_err());
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_success_confirms_draft() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;

        controller.start_editing().unwrap();
        controller
            .update_field(ProfileField::FullName, "Ana Souza".to_string())
            .unwrap();

        let outcome = controller.commit().await.unwrap();
        assert_eq!(outcome, CommitOutcome::Confirmed);

        let session = controller.snapshot();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.committed().full_name, "Ana Souza");
        assert_eq!(session.draft(), session.committed());
        assert_eq!(remote.updates().len(), 1);
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_failure_resyncs_from_remote() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;
        remote.fail_next_update();

        controller.start_editing().unwrap();
        controller
            .update_field(ProfileField::FullName, "Rejected".to_string())
            .unwrap();

        let outcome = controller.commit().await.unwrap();
        assert_eq!(outcome, CommitOutcome::Reverted);

        let session = controller.snapshot();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.committed().full_name, "Ana");
        assert_eq!(session.draft().full_name, "Ana");
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_commit_failure_then_empty_fetch_resets_to_defaults() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;
        remote.fail_next_update();
        remote.set_stored(None);

        controller.start_editing().unwrap();
        controller
            .update_field(ProfileField::DisplayName, "ana.s".to_string())
            .unwrap();
        controller.commit().await.unwrap();

        let session = controller.snapshot();
        assert_eq!(session.committed(), &UserProfile::default());
        assert_eq!(session.draft(), &UserProfile::default());
        assert_eq!(session.mode(), EditMode::Viewing);
    }

    #[tokio::test]
    async fn test_commit_requires_editing() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;
        let err = controller.commit().await.unwrap_err();
        assert!(matches!(err, EditError::InvalidTransition { .. }));
        assert!(remote.updates().is_empty());
    }

    #[tokio::test]
    async fn test_second_commit_rejected_while_in_flight() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;
        let gate = remote.hold_updates();

        controller.start_editing().unwrap();
        controller
            .update_field(ProfileField::FullName, "Ana Souza".to_string())
            .unwrap();

        let in_flight = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.commit().await })
        };

        // Wait until the first write has reached the remote
        while remote.updates().is_empty() {
            tokio::task::yield_now().await;
        }
        assert_eq!(controller.snapshot().mode(), EditMode::Committing);
        assert_eq!(controller.commit().await.unwrap_err(), EditError::CommitInFlight);
        assert!(
            controller
                .update_field(ProfileField::FullName, "late".to_string())
                .is_err()
        );

        gate.notify_one();
        assert_eq!(in_flight.await.unwrap().unwrap(), CommitOutcome::Confirmed);
        assert_eq!(remote.updates().len(), 1);
        assert_eq!(controller.snapshot().committed().full_name, "Ana Souza");
    }

    #[tokio::test]
    async fn test_toggle_is_visible_before_confirmation() {
        let remote = Arc::new(FakeRemote::new(Some(UserSettings::default())));
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        let gate = remote.hold_updates();

        let handle = controller
            .toggle(SettingsField::EmailAlertOnNewMessage, true)
            .unwrap();
        let session = controller.snapshot();
        assert!(session.draft().email_alert_on_new_message);
        assert!(session.committed().email_alert_on_new_message);
        assert_eq!(session.mode(), EditMode::Viewing);

        gate.notify_one();
        assert_eq!(handle.await.unwrap(), CommitOutcome::Confirmed);
        assert!(controller.snapshot().draft().email_alert_on_new_message);
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_toggle_failure_reverts_by_refetch() {
        let remote = Arc::new(FakeRemote::new(Some(UserSettings::default())));
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        remote.fail_next_update();

        let handle = controller
            .toggle(SettingsField::EmailAlertOnNewMessage, true)
            .unwrap();
        assert!(controller.snapshot().draft().email_alert_on_new_message);

        assert_eq!(handle.await.unwrap(), CommitOutcome::Reverted);
        let session = controller.snapshot();
        assert!(!session.draft().email_alert_on_new_message);
        assert!(!session.committed().email_alert_on_new_message);
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_rapid_toggles_write_one_at_a_time() {
        let remote = Arc::new(FakeRemote::new(Some(UserSettings::default())));
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        let gate = remote.hold_updates();

        let first = controller
            .toggle(SettingsField::EmailAlertOnNewMessage, true)
            .unwrap();
        while remote.updates().is_empty() {
            tokio::task::yield_now().await;
        }

        let second = controller
            .toggle(SettingsField::EmailAlertOnNewMessage, false)
            .unwrap();
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        // The second write waits for the slow first one
        assert_eq!(remote.updates().len(), 1);
        assert!(!controller.snapshot().draft().email_alert_on_new_message);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), CommitOutcome::Confirmed);
        gate.notify_one();
        assert_eq!(second.await.unwrap(), CommitOutcome::Confirmed);

        let sent: Vec<bool> = remote
            .updates()
            .iter()
            .map(|settings| settings.email_alert_on_new_message)
            .collect();
        assert_eq!(sent, vec![true, false]);
        assert_eq!(
            remote.stored.lock().unwrap().map(|s| s.email_alert_on_new_message),
            Some(false)
        );
        assert!(!controller.snapshot().committed().email_alert_on_new_message);
    }

    #[tokio::test]
    async fn test_commit_waits_for_pending_toggle() {
        let remote = Arc::new(FakeRemote::new(Some(UserSettings::default())));
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        let gate = remote.hold_updates();

        let toggled = controller
            .toggle(SettingsField::EmailAlertOnNewMessage, true)
            .unwrap();
        while remote.updates().is_empty() {
            tokio::task::yield_now().await;
        }

        controller.start_editing().unwrap();
        controller
            .update_field(SettingsField::EmailAlertOnNewMessage, false)
            .unwrap();
        let committed = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.commit().await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(remote.updates().len(), 1);

        gate.notify_one();
        assert_eq!(toggled.await.unwrap(), CommitOutcome::Confirmed);
        gate.notify_one();
        assert_eq!(committed.await.unwrap().unwrap(), CommitOutcome::Confirmed);
        assert_eq!(remote.updates().len(), 2);
        assert!(!controller.snapshot().committed().email_alert_on_new_message);
    }

    #[tokio::test]
    async fn test_commit_rejected_while_cancel_refetches() {
        let (controller, remote) = profile_controller(Some(profile("Ana"))).await;
        controller.start_editing().unwrap();
        controller
            .update_field(ProfileField::FullName, "Draft".to_string())
            .unwrap();

        let gate = remote.hold_fetches();
        let cancelling = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.cancel().await })
        };
        while remote.fetch_count() < 2 {
            tokio::task::yield_now().await;
        }

        let session = controller.snapshot();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.draft().full_name, "Ana");
        assert!(matches!(
            controller.commit().await,
            Err(EditError::InvalidTransition { .. })
        ));
        assert!(remote.updates().is_empty());

        gate.notify_one();
        cancelling.await.unwrap().unwrap();
        assert_eq!(controller.snapshot().mode(), EditMode::Viewing);
    }

    #[tokio::test]
    async fn test_toggle_rejected_while_editing() {
        let remote = Arc::new(FakeRemote::new(Some(UserSettings::default())));
        let controller = EditController::new(Arc::clone(&remote));
        controller.initialize().await;
        controller.start_editing().unwrap();

        assert!(
            controller
                .toggle(SettingsField::EmailAlertOnNewMessage, true)
                .is_err()
        );
        assert!(remote.updates().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let (profile_ctl, _) = profile_controller(Some(profile("Ana"))).await;
        let settings_remote = Arc::new(FakeRemote::new(Some(UserSettings::default())));
        let settings_ctl = EditController::new(Arc::clone(&settings_remote));
        settings_ctl.initialize().await;

        profile_ctl.start_editing().unwrap();
        let handle = settings_ctl
            .toggle(SettingsField::EmailAlertOnNewMessage, true)
            .unwrap();
        assert_eq!(handle.await.unwrap(), CommitOutcome::Confirmed);
        assert_eq!(profile_ctl.snapshot().mode(), EditMode::Editing);
    }
}
