//! Per-agent notification settings.

use serde::{Deserialize, Serialize};

/// Notification settings for the signed-in agent.
///
/// The default (all alerts off) is what the console falls back to when the
/// backend has no settings record or cannot be reached.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSettings {
    /// Send an email whenever a customer writes in.
    #[serde(default)]
    pub email_alert_on_new_message: bool,
}

/// Settings an agent may toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    EmailAlertOnNewMessage,
}

/// Partial update sent when a toggle changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub email_alert_on_new_message: bool,
}

impl UserSettings {
    #[must_use]
    pub const fn get(&self, field: SettingsField) -> bool {
        match field {
            SettingsField::EmailAlertOnNewMessage => self.email_alert_on_new_message,
        }
    }

    pub const fn set(&mut self, field: SettingsField, value: bool) {
        match field {
            SettingsField::EmailAlertOnNewMessage => self.email_alert_on_new_message = value,
        }
    }

    /// The payload for saving these settings.
    #[must_use]
    pub const fn to_update(&self) -> SettingsUpdate {
        SettingsUpdate {
            email_alert_on_new_message: self.email_alert_on_new_message,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flag_defaults_to_false() {
        let settings: UserSettings = serde_json::from_str("{}").unwrap();
        assert!(!settings.email_alert_on_new_message);
    }

    #[test]
    fn test_set_flag() {
        let mut settings = UserSettings::default();
        settings.set(SettingsField::EmailAlertOnNewMessage, true);
        assert!(settings.get(SettingsField::EmailAlertOnNewMessage));
        assert!(settings.to_update().email_alert_on_new_message);
    }
}
