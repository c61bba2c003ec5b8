//! Conversation listing commands.

use std::collections::HashSet;

use atende_console::remote::ConversationSource;
use atende_console::summary::customer::NO_COMPANY;
use atende_console::summary::{
    ConversationSummary, CustomerDetails, Property, RowBadge, customer_details, project_at,
    relative_label_or_default, resolve_owner,
};
use atende_core::{ConversationId, ConversationStatus, CustomerId, Message};
use chrono::{DateTime, Utc};

use super::CommandError;

/// Print one summary row per conversation, newest activity as the backend
/// orders it.
pub async fn list<S: ConversationSource>(
    source: &S,
    online: &[CustomerId],
    status: Option<ConversationStatus>,
) -> Result<(), CommandError> {
    let threads = source.list_conversations().await?;
    let online: HashSet<CustomerId> = online.iter().copied().collect();
    let now = Utc::now();

    let mut shown = 0_usize;
    for thread in threads
        .iter()
        .filter(|thread| status.is_none_or(|wanted| thread.conversation.status == wanted))
    {
        let summary = project_at(&thread.conversation, &thread.messages, now);
        let is_online = online.contains(&thread.conversation.customer.id);
        println!("{}", render_row(&summary, is_online));
        shown += 1;
    }

    tracing::debug!(shown, total = threads.len(), "Listed conversations");
    if shown == 0 {
        println!("No conversations.");
    }
    Ok(())
}

/// Print a conversation's summary, its messages, then the customer panel.
pub async fn show<S: ConversationSource>(
    source: &S,
    id: ConversationId,
    customer_online: bool,
) -> Result<(), CommandError> {
    let thread = source.conversation(id).await?;
    let now = Utc::now();

    let summary = project_at(&thread.conversation, &thread.messages, now);
    println!("{}", render_row(&summary, customer_online));
    println!();
    for message in &thread.messages {
        println!("{}", render_message(message, now));
    }
    println!();
    print!(
        "{}",
        render_details(&customer_details(&thread.conversation.customer, customer_online))
    );
    Ok(())
}

fn badge_label(badge: &RowBadge) -> &str {
    match badge {
        RowBadge::Unread => "unread",
        RowBadge::Online => "Online",
        RowBadge::Date(label) => label,
    }
}

fn render_row(summary: &ConversationSummary, customer_online: bool) -> String {
    let mut flags = String::new();
    if summary.is_priority {
        flags.push_str(" [priority]");
    }
    if summary.is_closed {
        flags.push_str(" [closed]");
    }

    format!(
        "{:>6}  {}{}  {}\n        {}",
        badge_label(&summary.badge(customer_online)),
        summary.customer_label,
        flags,
        summary.conversation_id,
        summary.preview_text,
    )
}

fn render_section(out: &mut String, title: &str, properties: &[Property]) {
    out.push_str(title);
    out.push('\n');
    for property in properties {
        out.push_str(&format!("  {:<14} {}", property.name, property.value));
        if let Some(link) = property.link.as_deref().filter(|link| *link != property.value) {
            out.push_str(&format!(" <{link}>"));
        }
        out.push('\n');
    }
}

fn render_details(details: &CustomerDetails) -> String {
    let mut out = String::new();
    if let Some(title) = &details.title {
        out.push_str(&format!("{title}\n"));
    }
    render_section(&mut out, "Basic", &details.basic);
    render_section(&mut out, "Activity", &details.activity);
    render_section(&mut out, "Device", &details.device);
    match &details.company {
        Some(company) => render_section(&mut out, "Company", company),
        None => out.push_str(&format!("Company\n  {NO_COMPANY}\n")),
    }
    if !details.metadata.is_empty() {
        render_section(&mut out, "Metadata", &details.metadata);
    }
    out
}

fn render_message(message: &Message, now: DateTime<Utc>) -> String {
    format!(
        "{:>6}  {}: {}",
        relative_label_or_default(message.created_at.as_ref(), now),
        resolve_owner(message.user.as_ref()),
        message.text().unwrap_or("..."),
    )
}

#[cfg(test)]
mod tests {
    use atende_core::{Actor, Conversation, ConversationPriority, Customer, Timestamp};
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("valid date"))
    }

    fn summary(read: bool) -> ConversationSummary {
        let conversation = Conversation {
            id: ConversationId::random(),
            priority: ConversationPriority::Normal,
            status: ConversationStatus::Open,
            created_at: None,
            read,
            customer: Customer::new(CustomerId::random()),
        };
        let messages = vec![Message {
            body: Some("preciso de ajuda".to_string()),
            created_at: Some(Timestamp::from(now() - Duration::minutes(5))),
            ..Message::default()
        }];
        project_at(&conversation, &messages, now())
    }

    #[test]
    fn test_row_shows_badge_and_preview() {
        let row = render_row(&summary(true), false);
        assert!(row.starts_with("    5m  Anonymous User"));
        assert!(row.ends_with("Anônimo: preciso de ajuda"));

        assert!(render_row(&summary(true), true).starts_with("Online"));
        assert!(render_row(&summary(false), true).starts_with("unread"));
    }

    #[test]
    fn test_details_render_every_section() {
        let customer = Customer {
            name: Some("Bia".to_string()),
            current_url: Some("https://acme.io/pricing".to_string()),
            pathname: Some("/pricing".to_string()),
            ..Customer::new(CustomerId::random())
        };
        let text = render_details(&customer_details(&customer, true));

        assert!(text.starts_with("Basic\n"));
        assert!(text.contains("  Name           Bia\n"));
        assert!(text.contains("  Last Seen      Online now\n"));
        assert!(text.contains("  Last Seen URL  /pricing <https://acme.io/pricing>\n"));
        assert!(text.contains("  Timezone       Unknown\n"));
        assert!(text.contains(&format!("Company\n  {NO_COMPANY}\n")));
        assert!(!text.contains("Metadata"));
    }

    #[test]
    fn test_message_line_uses_owner_label() {
        let message = Message {
            body: Some("Já verifiquei".to_string()),
            created_at: Some(Timestamp::from(now() - Duration::hours(3))),
            user: Some(Actor {
                email: Some("ana.souza@acme.io".to_string()),
                ..Actor::default()
            }),
            ..Message::default()
        };
        assert_eq!(render_message(&message, now()), "    3h  ana.souza: Já verifiquei");
    }
}
