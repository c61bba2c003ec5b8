//! The two editing surfaces of the agent's account page.
//!
//! [`ProfileSession`] is a form with an explicit edit/save/cancel cycle.
//! [`SettingsSession`] holds toggles that save themselves in the background.

pub mod profile;
pub mod settings;

pub use profile::ProfileSession;
pub use settings::SettingsSession;
