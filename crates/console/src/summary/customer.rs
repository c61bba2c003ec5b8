//! Customer details shown beside a conversation.
//!
//! Every property the backend left out reads [`UNKNOWN`], so the panel keeps
//! the same shape for every customer.

use atende_core::{Company, Customer, Timestamp};
use serde_json::Value;

/// Placeholder for a property the backend did not report.
pub const UNKNOWN: &str = "Unknown";

/// Shown in place of the company section for unlinked customers.
pub const NO_COMPANY: &str = "Customer is not linked to a company.";

/// Shown as the last-seen value while the customer has a live session.
pub const ONLINE_NOW: &str = "Online now";

const DATE_FORMAT: &str = "%B %d, %Y";
const SLACK_REDIRECT: &str = "https://slack.com/app_redirect?channel=";

/// One labelled value. `link` is set when the value points somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub link: Option<String>,
}

impl Property {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            link: None,
        }
    }

    fn or_unknown(name: &str, value: Option<&str>) -> Self {
        Self::new(name, value.unwrap_or(UNKNOWN))
    }

    fn linked(name: &str, value: impl Into<String>, link: String) -> Self {
        Self {
            link: Some(link),
            ..Self::new(name, value)
        }
    }
}

/// Everything the details panel shows, grouped the way it is laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDetails {
    /// Title of the page the customer was last on.
    pub title: Option<String>,
    pub basic: Vec<Property>,
    pub activity: Vec<Property>,
    pub device: Vec<Property>,
    /// `None` when the customer is not linked to a company.
    pub company: Option<Vec<Property>>,
    /// Empty when the customer carries no metadata.
    pub metadata: Vec<Property>,
}

/// Build the details panel for `customer`. `online` is whether the customer
/// has a live browser session right now.
#[must_use]
pub fn customer_details(customer: &Customer, online: bool) -> CustomerDetails {
    let id = customer
        .external_id
        .clone()
        .filter(|external| !external.is_empty())
        .unwrap_or_else(|| customer.id.to_string());

    CustomerDetails {
        title: customer.title.clone(),
        basic: vec![
            Property::new("ID", id),
            Property::or_unknown("Name", customer.name.as_deref()),
            Property::or_unknown("Email", customer.email.as_deref()),
            Property::or_unknown("Phone", customer.phone.as_deref()),
        ],
        activity: vec![
            Property::new("First Seen", date_or_unknown(customer.created_at.as_ref())),
            Property::new("Last Seen", last_seen(customer, online)),
            last_seen_url(customer),
        ],
        device: vec![
            Property::new("Timezone", time_zone(customer.time_zone.as_deref())),
            Property::or_unknown("Browser", customer.browser.as_deref()),
            Property::or_unknown("OS", customer.os.as_deref()),
            Property::or_unknown("IP", customer.ip.as_deref()),
        ],
        company: customer.company.as_ref().map(company),
        metadata: customer
            .metadata
            .iter()
            .flatten()
            .map(|(key, value)| Property::new(key.as_str(), metadata_value(value)))
            .collect(),
    }
}

fn date_or_unknown(timestamp: Option<&Timestamp>) -> String {
    timestamp
        .and_then(Timestamp::to_utc)
        .map_or_else(|| UNKNOWN.to_string(), |at| at.format(DATE_FORMAT).to_string())
}

fn last_seen(customer: &Customer, online: bool) -> String {
    if online {
        ONLINE_NOW.to_string()
    } else {
        date_or_unknown(customer.last_seen_at.as_ref())
    }
}

/// The path is the shorter label, unless it is just `/`.
fn last_seen_url(customer: &Customer) -> Property {
    const NAME: &str = "Last Seen URL";

    match customer.current_url.as_deref() {
        Some(url) if !url.is_empty() => {
            let label = customer
                .pathname
                .as_deref()
                .filter(|path| path.chars().count() > 1)
                .unwrap_or(url);
            Property::linked(NAME, label, url.to_string())
        }
        _ => Property::new(NAME, UNKNOWN),
    }
}

fn time_zone(zone: Option<&str>) -> String {
    match zone {
        Some(zone) if !zone.is_empty() => zone.replace('_', " "),
        _ => UNKNOWN.to_string(),
    }
}

fn company(company: &Company) -> Vec<Property> {
    let slack = match (
        company.slack_channel_id.as_deref(),
        company.slack_channel_name.as_deref(),
    ) {
        (Some(id), Some(name)) if !id.is_empty() && !name.is_empty() => {
            Property::linked("Slack Channel", name, format!("{SLACK_REDIRECT}{id}"))
        }
        _ => Property::new("Slack Channel", UNKNOWN),
    };

    vec![
        Property::or_unknown("Name", company.name.as_deref()),
        Property::or_unknown("Website", company.website_url.as_deref()),
        slack,
    ]
}

fn metadata_value(value: &Value) -> String {
    match value {
        Value::Null => UNKNOWN.to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
