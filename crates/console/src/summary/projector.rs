//! Inbox row summary for a conversation.

use atende_core::{Conversation, ConversationId, Message};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::owner::resolve_owner;
use super::relative_time::relative_label_or_default;

/// Preview body shown when the latest message has no text (or there is none).
pub const EMPTY_PREVIEW: &str = "...";

/// Display-ready summary of one conversation.
///
/// Always derived from a conversation plus its messages; never edited in
/// place. Recompute it whenever either input changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    /// Who the conversation is with (name, email, or a placeholder).
    pub customer_label: String,
    /// Who wrote the latest message.
    pub owner_label: String,
    /// `"{owner}: {body}"` of the latest message.
    pub preview_text: String,
    /// Age of the latest activity, e.g. `"5m"`.
    pub relative_date: String,
    pub is_unread: bool,
    pub is_priority: bool,
    pub is_closed: bool,
}

/// Status indicator shown at the right of an inbox row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowBadge {
    /// Customer wrote something nobody has read yet.
    Unread,
    /// Read, and the customer is on the site right now.
    Online,
    /// Read and offline: show how old the latest activity is.
    Date(String),
}

impl ConversationSummary {
    /// Pick the row badge given the customer's live presence.
    #[must_use]
    pub fn badge(&self, customer_online: bool) -> RowBadge {
        if self.is_unread {
            RowBadge::Unread
        } else if customer_online {
            RowBadge::Online
        } else {
            RowBadge::Date(self.relative_date.clone())
        }
    }
}

/// Summarize a conversation against the wall clock.
///
/// `messages` must be ordered oldest-first; the last element is taken as the
/// latest activity without re-sorting.
#[must_use]
pub fn project(conversation: &Conversation, messages: &[Message]) -> ConversationSummary {
    project_at(conversation, messages, Utc::now())
}

/// Summarize a conversation relative to `now`.
#[must_use]
pub fn project_at(
    conversation: &Conversation,
    messages: &[Message],
    now: DateTime<Utc>,
) -> ConversationSummary {
    let recent = messages.last();

    let reference = match recent {
        Some(message) => message.created_at.as_ref(),
        None => conversation.created_at.as_ref(),
    };
    let owner_label = resolve_owner(recent.and_then(|message| message.user.as_ref()));
    let body = recent.and_then(Message::text).unwrap_or(EMPTY_PREVIEW);

    ConversationSummary {
        conversation_id: conversation.id,
        customer_label: conversation.customer.label().to_string(),
        preview_text: format!("{owner_label}: {body}"),
        owner_label,
        relative_date: relative_label_or_default(reference, now),
        is_unread: !conversation.read,
        is_priority: conversation.is_priority(),
        is_closed: conversation.is_closed(),
    }
}
