//! Integration tests for the Atende console.
//!
//! [`FakeBackend`] serves the console's HTTP API from memory on an ephemeral
//! port, so the real `reqwest` client and the edit sessions can be exercised
//! end to end without any external service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atende-integration-tests
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use atende_console::remote::{ApiClient, ConversationThread};
use atende_core::{ConversationId, Profile, ProfileUpdate, SettingsUpdate, UserId, UserSettings};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use url::Url;

/// Token the fake backend accepts.
pub const TEST_TOKEN: &str = "tk_integration_4f1c9a";

/// Backend-side data and failure switches.
#[derive(Debug, Default)]
struct BackendState {
    profile: Option<Profile>,
    settings: Option<UserSettings>,
    threads: Vec<ConversationThread>,
    /// Number of upcoming writes to reject with 422.
    failing_writes: usize,
    /// Answer profile saves with only `full_name`.
    sparse_profile_responses: bool,
    writes: usize,
}

type SharedState = Arc<Mutex<BackendState>>;

#[derive(Deserialize)]
struct ProfileBody {
    profile: ProfileUpdate,
}

#[derive(Deserialize)]
struct SettingsBody {
    user_settings: SettingsUpdate,
}

/// In-memory backend running on a background task.
#[derive(Debug, Clone)]
pub struct FakeBackend {
    state: SharedState,
    base_url: Url,
}

impl FakeBackend {
    /// Bind to an ephemeral port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start() -> Self {
        let state = SharedState::default();
        let app = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().expect("Listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake backend stopped");
        });

        let base_url = Url::parse(&format!("http://{addr}")).expect("Invalid backend URL");
        Self { state, base_url }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A client authenticated with [`TEST_TOKEN`].
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> Arc<ApiClient> {
        self.client_with_token(TEST_TOKEN)
    }

    /// A client using an arbitrary token.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client_with_token(&self, token: &str) -> Arc<ApiClient> {
        let client = ApiClient::with_token(
            self.base_url.clone(),
            &SecretString::from(token),
            Duration::from_secs(5),
        )
        .expect("Failed to build API client");
        Arc::new(client)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_profile(&self, profile: Option<Profile>) {
        self.lock().profile = profile;
    }

    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.lock().profile.clone()
    }

    pub fn set_settings(&self, settings: Option<UserSettings>) {
        self.lock().settings = settings;
    }

    #[must_use]
    pub fn settings(&self) -> Option<UserSettings> {
        self.lock().settings
    }

    pub fn add_thread(&self, thread: ConversationThread) {
        self.lock().threads.push(thread);
    }

    /// Reject the next `count` writes.
    pub fn fail_next_writes(&self, count: usize) {
        self.lock().failing_writes = count;
    }

    pub fn sparse_profile_responses(&self, enabled: bool) {
        self.lock().sparse_profile_responses = enabled;
    }

    /// Writes received so far, including rejected ones.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }
}

/// A profile as the backend would store it for a fresh agent.
#[must_use]
pub fn agent_profile(email: &str, full_name: &str, display_name: &str) -> Profile {
    Profile {
        id: Some(UserId::new(7)),
        email: Some(email.to_string()),
        display_name: Some(display_name.to_string()),
        full_name: Some(full_name.to_string()),
        profile_photo_url: None,
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/profile", get(get_profile).put(put_profile))
        .route("/api/user_settings", get(get_settings).put(put_settings))
        .route("/api/conversations", get(list_conversations))
        .route("/api/conversations/{id}", get(get_conversation))
        .with_state(state)
}

// =============================================================================
// Handlers
// =============================================================================

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TEST_TOKEN}");
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"errors": {"detail": "Unauthorized"}})),
    )
        .into_response()
}

fn rejected() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"errors": {"detail": "Unprocessable Entity"}})),
    )
        .into_response()
}

/// Count a write and report whether it should be rejected.
fn take_write(state: &mut BackendState) -> bool {
    state.writes += 1;
    if state.failing_writes > 0 {
        state.failing_writes -= 1;
        return true;
    }
    false
}

async fn get_profile(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
    Json(json!({ "data": state.profile })).into_response()
}

async fn put_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<ProfileBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if take_write(&mut state) {
        return rejected();
    }

    let mut profile = state.profile.clone().unwrap_or(Profile {
        id: Some(UserId::new(7)),
        email: None,
        display_name: None,
        full_name: None,
        profile_photo_url: None,
    });
    profile.display_name = Some(body.profile.display_name);
    profile.full_name = Some(body.profile.full_name);
    profile.profile_photo_url = Some(body.profile.profile_photo_url);
    state.profile = Some(profile.clone());

    if state.sparse_profile_responses {
        Json(json!({ "data": { "full_name": profile.full_name } })).into_response()
    } else {
        Json(json!({ "data": profile })).into_response()
    }
}

async fn get_settings(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
    Json(json!({ "data": state.settings })).into_response()
}

async fn put_settings(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<SettingsBody>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
    if take_write(&mut state) {
        return rejected();
    }

    let settings = UserSettings {
        email_alert_on_new_message: body.user_settings.email_alert_on_new_message,
    };
    state.settings = Some(settings);
    Json(json!({ "data": settings })).into_response()
}

async fn list_conversations(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
    Json(json!({ "data": state.threads })).into_response()
}

async fn get_conversation(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<ConversationId>,
) -> Response {
    if !authorized(&headers) {
        return unauthorized();
    }
    let state = state.lock().unwrap_or_else(PoisonError::into_inner);
    match state
        .threads
        .iter()
        .find(|thread| thread.conversation.id == id)
    {
        Some(thread) => Json(json!({ "data": thread })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"errors": {"detail": "Not Found"}})),
        )
            .into_response(),
    }
}
