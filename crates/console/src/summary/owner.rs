//! Display label for the author of a message.

use atende_core::Actor;

/// Label for messages with no agent attached (customer side).
pub const ANONYMOUS: &str = "Anônimo";

/// Label for an agent we know nothing else about.
pub const OPERATOR: &str = "Operador";

/// Resolve the label shown as a message's owner.
///
/// Later sources override earlier ones: presence default, then the email's
/// local part, then the full name, then the display name. Missing or empty
/// values are skipped, so the result is never empty.
///
/// ```
/// use atende_console::summary::resolve_owner;
/// use atende_core::Actor;
///
/// let actor = Actor {
///     email: Some("ana@example.com".to_string()),
///     ..Actor::default()
/// };
/// assert_eq!(resolve_owner(Some(&actor)), "ana");
/// assert_eq!(resolve_owner(None), "Anônimo");
/// ```
#[must_use]
pub fn resolve_owner(actor: Option<&Actor>) -> String {
    let Some(actor) = actor else {
        return ANONYMOUS.to_string();
    };

    let from_email = actor
        .email
        .as_deref()
        .and_then(|email| email.split('@').next());

    [
        from_email,
        actor.full_name.as_deref(),
        actor.display_name.as_deref(),
    ]
    .into_iter()
    .rev()
    .flatten()
    .find(|label| !label.is_empty())
    .unwrap_or(OPERATOR)
    .to_string()
}
