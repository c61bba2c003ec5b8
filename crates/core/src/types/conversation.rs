//! Conversations between customers and agents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::{CompanyId, ConversationId, CustomerId};
use super::status::{ConversationPriority, ConversationStatus};
use super::timestamp::Timestamp;

/// Label shown for customers that never told us who they are.
pub const ANONYMOUS_CUSTOMER: &str = "Anonymous User";

/// The company a customer belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Company {
    pub id: CompanyId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub slack_channel_id: Option<String>,
    #[serde(default)]
    pub slack_channel_name: Option<String>,
}

/// The customer on the other side of a conversation.
///
/// Only `id` is required. Everything else is whatever the chat widget and
/// the integrating site managed to report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    /// The integrating site's own id for this customer.
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// First seen.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub last_seen_at: Option<Timestamp>,
    #[serde(default)]
    pub current_url: Option<String>,
    #[serde(default)]
    pub pathname: Option<String>,
    /// Title of the page the customer was last on.
    #[serde(default)]
    pub title: Option<String>,
    /// IANA zone name, e.g. `America/Sao_Paulo`.
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub browser: Option<String>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub company: Option<Company>,
    /// Free-form attributes set by the integrating site.
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl Customer {
    /// A customer known only by id.
    #[must_use]
    pub const fn new(id: CustomerId) -> Self {
        Self {
            id,
            external_id: None,
            name: None,
            email: None,
            phone: None,
            created_at: None,
            last_seen_at: None,
            current_url: None,
            pathname: None,
            title: None,
            time_zone: None,
            browser: None,
            os: None,
            ip: None,
            company: None,
            metadata: None,
        }
    }

    /// Name for the conversation list: name, then email, then a placeholder.
    #[must_use]
    pub fn label(&self) -> &str {
        [self.name.as_deref(), self.email.as_deref()]
            .into_iter()
            .flatten()
            .find(|value| !value.is_empty())
            .unwrap_or(ANONYMOUS_CUSTOMER)
    }
}

/// A conversation as listed in the inbox.
///
/// Messages are delivered separately (or embedded by the transport); this
/// record only carries the conversation's own attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    #[serde(default)]
    pub priority: ConversationPriority,
    #[serde(default)]
    pub status: ConversationStatus,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// Whether an agent has seen the latest customer message.
    #[serde(default)]
    pub read: bool,
    pub customer: Customer,
}

impl Conversation {
    #[must_use]
    pub fn is_priority(&self) -> bool {
        self.priority == ConversationPriority::Priority
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == ConversationStatus::Closed
    }
}
