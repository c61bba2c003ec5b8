//! Notification settings commands.

use std::sync::Arc;

use atende_console::account::SettingsSession;
use atende_console::edit::CommitOutcome;
use atende_console::remote::ApiClient;

use super::CommandError;

const fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub async fn show(api: Arc<ApiClient>) -> Result<(), CommandError> {
    let session = SettingsSession::start(api).await;
    println!("E-mail alerts on new message: {}", on_off(session.email_alerts()));
    Ok(())
}

/// Flip the e-mail alert toggle and wait for the background save, since the
/// process exits right after.
pub async fn set_email_alerts(api: Arc<ApiClient>, enabled: bool) -> Result<(), CommandError> {
    let session = SettingsSession::start(api).await;
    let pending = session.toggle_email_alerts(enabled)?;

    match pending.await? {
        CommitOutcome::Confirmed => {
            tracing::info!(enabled, "E-mail alerts updated");
            println!("E-mail alerts on new message: {}", on_off(session.email_alerts()));
            Ok(())
        }
        CommitOutcome::Reverted => {
            println!(
                "E-mail alerts on new message: {} (unchanged)",
                on_off(session.email_alerts())
            );
            Err(CommandError::NotSaved("settings"))
        }
    }
}
