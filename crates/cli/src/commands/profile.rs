//! Profile commands.

use std::sync::Arc;

use atende_console::account::ProfileSession;
use atende_console::edit::CommitOutcome;
use atende_console::remote::ApiClient;
use atende_core::UserProfile;

use super::{CommandError, or_dash};

/// Fields passed on the command line; `None` leaves a field as it is.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileChanges {
    const fn is_empty(&self) -> bool {
        self.full_name.is_none() && self.display_name.is_none() && self.photo_url.is_none()
    }
}

pub async fn show(api: Arc<ApiClient>) -> Result<(), CommandError> {
    let session = ProfileSession::start(api).await;
    println!("{}", render(&session.view()));
    Ok(())
}

/// Apply `changes` in one edit cycle and save.
pub async fn edit(api: Arc<ApiClient>, changes: ProfileChanges) -> Result<(), CommandError> {
    if changes.is_empty() {
        return Err(CommandError::NoChanges);
    }

    let session = ProfileSession::start(api).await;
    session.start_editing()?;
    if let Some(full_name) = changes.full_name {
        session.set_full_name(full_name)?;
    }
    if let Some(display_name) = changes.display_name {
        session.set_display_name(display_name)?;
    }
    if let Some(photo_url) = changes.photo_url {
        session.set_profile_photo_url(photo_url)?;
    }

    match session.save().await? {
        CommitOutcome::Confirmed => {
            tracing::info!("Profile saved");
            println!("{}", render(&session.view()));
            Ok(())
        }
        CommitOutcome::Reverted => Err(CommandError::NotSaved("profile")),
    }
}

fn render(profile: &UserProfile) -> String {
    format!(
        "Email:         {}\nFull name:     {}\nDisplay name:  {}\nPhoto URL:     {}",
        or_dash(&profile.email),
        or_dash(&profile.full_name),
        or_dash(&profile.display_name),
        or_dash(&profile.profile_photo_url),
    )
}
