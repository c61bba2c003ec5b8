//! Chat messages and their authors.

use serde::{Deserialize, Serialize};

use super::id::MessageId;
use super::timestamp::Timestamp;

/// The agent who wrote a message.
///
/// Customer messages carry no actor at all. An actor with every field empty
/// is still an agent, just one without a usable name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// One message in a conversation.
///
/// Message lists are ordered oldest-first by whoever delivers them; nothing
/// in this crate re-sorts them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    #[serde(default)]
    pub id: Option<MessageId>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub user: Option<Actor>,
}

impl Message {
    /// The body, or `None` when it is missing or empty.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}
