//! Agent profile records.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// Profile record as returned by the backend.
///
/// Every text field may be `null` (or missing) on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Owning user. Save responses may leave it out.
    #[serde(default, rename = "user_id")]
    pub id: Option<UserId>,
    /// Login email; assigned by the server and never sent back.
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred chat name.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
}

/// The editable view of a profile.
///
/// This is what an edit session holds in its `committed` and `draft` slots.
/// The default value (all fields empty) is what the console shows when the
/// backend has no profile for the agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Read-only from the console's point of view.
    pub email: String,
    pub display_name: String,
    pub full_name: String,
    pub profile_photo_url: String,
}

/// Fields an agent may change on their profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    DisplayName,
    FullName,
    ProfilePhotoUrl,
}

/// Partial update sent when saving a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub display_name: String,
    pub full_name: String,
    pub profile_photo_url: String,
}

impl UserProfile {
    /// Returns the current value of an editable field.
    #[must_use]
    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::DisplayName => &self.display_name,
            ProfileField::FullName => &self.full_name,
            ProfileField::ProfilePhotoUrl => &self.profile_photo_url,
        }
    }

    /// Overwrite an editable field. Any string is accepted.
    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::DisplayName => self.display_name = value,
            ProfileField::FullName => self.full_name = value,
            ProfileField::ProfilePhotoUrl => self.profile_photo_url = value,
        }
    }

    /// The payload for saving this profile.
    #[must_use]
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            display_name: self.display_name.clone(),
            full_name: self.full_name.clone(),
            profile_photo_url: self.profile_photo_url.clone(),
        }
    }

    /// Merge a save response over this (submitted) profile.
    ///
    /// Fields the response leaves out keep the submitted value.
    #[must_use]
    pub fn confirmed_by(&self, response: Profile) -> Self {
        Self {
            email: response.email.unwrap_or_else(|| self.email.clone()),
            display_name: response
                .display_name
                .unwrap_or_else(|| self.display_name.clone()),
            full_name: response.full_name.unwrap_or_else(|| self.full_name.clone()),
            profile_photo_url: response
                .profile_photo_url
                .unwrap_or_else(|| self.profile_photo_url.clone()),
        }
    }
}

impl From<Profile> for UserProfile {
    fn from(profile: Profile) -> Self {
        Self {
            email: profile.email.unwrap_or_default(),
            display_name: profile.display_name.unwrap_or_default(),
            full_name: profile.full_name.unwrap_or_default(),
            profile_photo_url: profile.profile_photo_url.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_decodes_with_nulls() {
        let json = r#"{"user_id": 3, "email": "ana@example.com", "display_name": null}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, Some(UserId::new(3)));
        assert_eq!(profile.display_name, None);
        assert_eq!(profile.full_name, None);

        let view = UserProfile::from(profile);
        assert_eq!(view.email, "ana@example.com");
        assert_eq!(view.display_name, "");
        assert_eq!(view.profile_photo_url, "");
    }

    #[test]
    fn test_set_and_get_fields() {
        let mut profile = UserProfile::default();
        profile.set(ProfileField::FullName, "Ana Souza".to_string());
        profile.set(ProfileField::DisplayName, "Ana".to_string());
        assert_eq!(profile.get(ProfileField::FullName), "Ana Souza");
        assert_eq!(profile.get(ProfileField::DisplayName), "Ana");
        assert_eq!(profile.get(ProfileField::ProfilePhotoUrl), "");
    }

    #[test]
    fn test_update_payload_excludes_email() {
        let profile = UserProfile {
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            full_name: "Ana Souza".to_string(),
            profile_photo_url: String::new(),
        };
        let json = serde_json::to_value(profile.to_update()).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["display_name"], "Ana");
    }

    #[test]
    fn test_confirmed_by_keeps_submitted_values_for_omitted_fields() {
        let submitted = UserProfile {
            email: "ana@example.com".to_string(),
            display_name: "Ana".to_string(),
            full_name: "Ana Souza".to_string(),
            profile_photo_url: "https://img.example.com/ana.png".to_string(),
        };
        let response = Profile {
            id: Some(UserId::new(1)),
            email: None,
            display_name: Some("Aninha".to_string()),
            full_name: None,
            profile_photo_url: None,
        };

        let confirmed = submitted.confirmed_by(response);
        assert_eq!(confirmed.display_name, "Aninha");
        assert_eq!(confirmed.full_name, "Ana Souza");
        assert_eq!(confirmed.email, "ana@example.com");
        assert_eq!(confirmed.profile_photo_url, "https://img.example.com/ana.png");
    }

    #[test]
    fn test_save_response_without_user_id_decodes() {
        let response: Profile = serde_json::from_str(r#"{"full_name": "Ana"}"#).unwrap();
        assert_eq!(response.id, None);

        let confirmed = UserProfile {
            email: "ana@example.com".to_string(),
            display_name: "ana".to_string(),
            full_name: "Ana Souza".to_string(),
            profile_photo_url: String::new(),
        }
        .confirmed_by(response);
        assert_eq!(confirmed.full_name, "Ana");
        assert_eq!(confirmed.display_name, "ana");
    }
}
