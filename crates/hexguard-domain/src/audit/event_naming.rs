use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use hexguard_types::{ids, Role, Severity, ViolationRecord};

const IRREGULAR_PAST: &[&str] = &[
    "Begun", "Bought", "Broken", "Brought", "Built", "Caught", "Chosen", "Cut", "Done", "Drawn",
    "Found", "Frozen", "Given", "Gone", "Grown", "Held", "Hit", "Kept", "Known", "Left", "Lost",
    "Made", "Met", "Paid", "Put", "Quit", "Read", "Reset", "Sent", "Set", "Shown", "Shut", "Sold",
    "Spent", "Split", "Spoken", "Stolen", "Taken", "Taught", "Thrown", "Undone", "Withdrawn",
    "Won", "Written",
];

/// Last camel-case word of `name` minus an `Event` suffix.
fn last_word(name: &str) -> &str {
    let stem = name.strip_suffix("Event").unwrap_or(name);
    let start = stem
        .char_indices()
        .filter(|(_, c)| c.is_ascii_uppercase())
        .map(|(i, _)| i)
        .last()
        .unwrap_or(0);
    &stem[start..]
}

pub fn is_past_tense(name: &str) -> bool {
    let word = last_word(name);
    word.ends_with("ed") || IRREGULAR_PAST.contains(&word)
}

pub struct EventNaming;

impl AuditRule for EventNaming {
    fn id(&self) -> &'static str {
        ids::RULE_EVENT_NAMING
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let out = ctx
            .with_role(Role::DomainEvent)
            .filter(|name| !is_past_tense(name.simple_name()))
            .map(|name| {
                violation(
                    ids::RULE_EVENT_NAMING,
                    Severity::Info,
                    vec![name.clone()],
                    format!("domain event '{name}' is not named in past tense"),
                )
            })
            .collect();
        Ok(out)
    }
}
