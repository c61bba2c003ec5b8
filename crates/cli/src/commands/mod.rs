//! Subcommand implementations.

pub mod conversations;
pub mod profile;
pub mod settings;

use std::sync::Arc;

use atende_console::ConsoleError;
use atende_console::config::ConsoleConfig;
use atende_console::edit::EditError;
use atende_console::remote::{ApiClient, RemoteError};
use thiserror::Error;

/// Errors that can occur while running a subcommand.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// The backend refused the change; local state was reloaded.
    #[error("The {0} change was not saved; reloaded the current values")]
    NotSaved(&'static str),

    /// The background save task died before settling.
    #[error("Background save did not finish: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Nothing to do.
    #[error("No changes given; pass at least one of --full-name, --display-name, --photo-url")]
    NoChanges,
}

impl From<RemoteError> for CommandError {
    fn from(error: RemoteError) -> Self {
        Self::Console(error.into())
    }
}

impl From<EditError> for CommandError {
    fn from(error: EditError) -> Self {
        Self::Console(error.into())
    }
}

/// Build the shared API client.
pub fn connect(config: &ConsoleConfig) -> Result<Arc<ApiClient>, CommandError> {
    let client = ApiClient::new(config)?;
    tracing::debug!(base_url = %client.base_url(), "Connected API client");
    Ok(Arc::new(client))
}

/// Render an empty string as a dash so blank fields stay visible.
fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
