//! Unified error handling for console front ends.

use thiserror::Error;

use crate::config::ConfigError;
use crate::edit::EditError;
use crate::remote::RemoteError;

/// Anything a console front end may have to report.
///
/// Sessions absorb remote failures themselves; this type is for the calls
/// that have no compensating action, like listing conversations or loading
/// configuration.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Backend call failed.
    #[error("Backend error: {0}")]
    Remote(#[from] RemoteError),

    /// An edit was attempted in the wrong mode.
    #[error("Edit rejected: {0}")]
    Edit(#[from] EditError),
}
