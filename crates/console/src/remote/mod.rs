//! Contracts with the backend that owns profiles, settings and messages.
//!
//! The controllers only see these traits. [`ApiClient`] implements them
//! over HTTP; tests plug in in-memory fakes.

pub mod http;

use std::future::Future;

use atende_core::{Conversation, ConversationId, Message};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use http::ApiClient;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the contract promises.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Could not build a request URL.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// The configured token cannot be sent as a header.
    #[error("Invalid API token: {0}")]
    Token(String),
}

/// Read/write access to one remotely owned record of type `T`.
pub trait RemoteEntity<T>: Send + Sync + 'static {
    /// Read the current record. `Ok(None)` means the backend has none.
    fn fetch(&self) -> impl Future<Output = Result<Option<T>, RemoteError>> + Send;

    /// Write `draft` and return the record as the backend now holds it.
    fn update(&self, draft: &T) -> impl Future<Output = Result<T, RemoteError>> + Send;
}

/// A conversation together with its messages, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationThread {
    #[serde(flatten)]
    pub conversation: Conversation,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Read access to conversations.
pub trait ConversationSource: Send + Sync {
    /// Every conversation visible to the agent, with messages embedded.
    fn list_conversations(
        &self,
    ) -> impl Future<Output = Result<Vec<ConversationThread>, RemoteError>> + Send;

    /// One conversation with its messages.
    fn conversation(
        &self,
        id: ConversationId,
    ) -> impl Future<Output = Result<ConversationThread, RemoteError>> + Send;
}
