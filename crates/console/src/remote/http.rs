//! HTTP client for the Atende backend API.
//!
//! Every response wraps its payload as `{"data": ...}`; requests carry the
//! agent's API token as a bearer header.

use std::time::Duration;

use atende_core::{
    ConversationId, Profile, ProfileUpdate, SettingsUpdate, UserProfile, UserSettings,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{ConversationSource, ConversationThread, RemoteEntity, RemoteError};
use crate::config::ConsoleConfig;

const PROFILE_PATH: &str = "api/profile";
const SETTINGS_PATH: &str = "api/user_settings";
const CONVERSATIONS_PATH: &str = "api/conversations";

/// Response wrapper. `data` must be present even when it is `null`, so the
/// payload is read as a raw value first and typed afterwards.
#[derive(Deserialize)]
struct Envelope {
    data: serde_json::Value,
}

#[derive(Serialize)]
struct ProfileRequest<'a> {
    profile: &'a ProfileUpdate,
}

#[derive(Serialize)]
struct SettingsRequest<'a> {
    user_settings: &'a SettingsUpdate,
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ConsoleConfig) -> Result<Self, RemoteError> {
        Self::with_token(
            config.api_url.clone(),
            &config.api_token,
            config.request_timeout,
        )
    }

    /// Create a client for an explicit base URL and token.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn with_token(
        base_url: Url,
        token: &SecretString,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| RemoteError::Token(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// The base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_data<D: DeserializeOwned>(&self, path: &str) -> Result<D, RemoteError> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        read_envelope(response).await
    }

    async fn put_data<B, D>(&self, path: &str, body: &B) -> Result<D, RemoteError>
    where
        B: Serialize + Sync,
        D: DeserializeOwned,
    {
        let response = self
            .client
            .put(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;
        read_envelope(response).await
    }

    /// Fetch the signed-in agent's profile.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) -> Result<Option<Profile>, RemoteError> {
        let profile: Option<Profile> = self.get_data(PROFILE_PATH).await?;
        debug!(found = profile.is_some(), "Fetched profile");
        Ok(profile)
    }

    /// Save the editable profile fields.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the update.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, RemoteError> {
        self.put_data(PROFILE_PATH, &ProfileRequest { profile: update })
            .await
    }

    /// Fetch the signed-in agent's notification settings.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn fetch_settings(&self) -> Result<Option<UserSettings>, RemoteError> {
        let settings: Option<UserSettings> = self.get_data(SETTINGS_PATH).await?;
        debug!(found = settings.is_some(), "Fetched settings");
        Ok(settings)
    }

    /// Save notification settings.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the update.
    #[instrument(skip(self))]
    pub async fn update_settings(
        &self,
        update: &SettingsUpdate,
    ) -> Result<UserSettings, RemoteError> {
        self.put_data(SETTINGS_PATH, &SettingsRequest {
            user_settings: update,
        })
        .await
    }

    /// List conversations with their messages.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn list_conversations(&self) -> Result<Vec<ConversationThread>, RemoteError> {
        let threads: Vec<ConversationThread> = self.get_data(CONVERSATIONS_PATH).await?;
        debug!(count = threads.len(), "Fetched conversations");
        Ok(threads)
    }

    /// Fetch one conversation with its messages.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the conversation does not exist,
    /// or the body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn conversation(&self, id: ConversationId) -> Result<ConversationThread, RemoteError> {
        self.get_data(&format!("{CONVERSATIONS_PATH}/{id}")).await
    }
}

impl RemoteEntity<UserProfile> for ApiClient {
    async fn fetch(&self) -> Result<Option<UserProfile>, RemoteError> {
        Ok(self.fetch_profile().await?.map(UserProfile::from))
    }

    async fn update(&self, draft: &UserProfile) -> Result<UserProfile, RemoteError> {
        let saved = self.update_profile(&draft.to_update()).await?;
        Ok(draft.confirmed_by(saved))
    }
}

impl RemoteEntity<UserSettings> for ApiClient {
    async fn fetch(&self) -> Result<Option<UserSettings>, RemoteError> {
        self.fetch_settings().await
    }

    async fn update(&self, draft: &UserSettings) -> Result<UserSettings, RemoteError> {
        self.update_settings(&draft.to_update()).await
    }
}

impl ConversationSource for ApiClient {
    async fn list_conversations(&self) -> Result<Vec<ConversationThread>, RemoteError> {
        Self::list_conversations(self).await
    }

    async fn conversation(&self, id: ConversationId) -> Result<ConversationThread, RemoteError> {
        Self::conversation(self, id).await
    }
}

/// Decode a `{"data": ...}` body, mapping failures to [`RemoteError`].
async fn read_envelope<D: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<D, RemoteError> {
    let status = response.status();

    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(RemoteError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await?;
    decode_envelope(&body)
}

fn decode_envelope<D: DeserializeOwned>(body: &[u8]) -> Result<D, RemoteError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| RemoteError::Decode(e.to_string()))?;
    serde_json::from_value(envelope.data).map_err(|e| RemoteError::Decode(e.to_string()))
}

/// `Url::join` drops the last path segment unless it ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
