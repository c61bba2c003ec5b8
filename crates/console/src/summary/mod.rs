//! Conversation summaries for the inbox list, and the customer details
//! panel shown next to an open conversation.
//!
//! Pure functions only: given a conversation, its ordered messages and a
//! clock reading, the same summary comes out every time.

pub mod customer;
pub mod owner;
pub mod projector;
pub mod relative_time;

pub use customer::{CustomerDetails, Property, customer_details};
pub use owner::resolve_owner;
pub use projector::{ConversationSummary, RowBadge, project, project_at};
pub use relative_time::{format_relative, relative_label, relative_label_or_default};
