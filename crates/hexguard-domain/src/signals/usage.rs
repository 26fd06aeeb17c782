use super::{ExtractContext, Priority, Signal};
use crate::error::ExtractionError;
use crate::model::TypeDescriptor;
use hexguard_types::Role;

const P: Priority = Priority::Usage;

/// How other types use this one. Corroborating only.
pub fn extract(
    ty: &TypeDescriptor,
    ctx: &ExtractContext<'_>,
) -> Result<Vec<Signal>, ExtractionError> {
    let mut out = Vec::new();

    if ctx.facts.is_repository_managed(&ty.name) {
        let managers: Vec<&str> = ctx.facts.managers_of(&ty.name).map(|n| n.as_str()).collect();
        out.push(
            Signal::new(
                "usage.repository-managed",
                P,
                Role::AggregateRoot,
                0.3,
                format!("persisted by {}", managers.join(", ")),
            )
            .corroborating(),
        );
    }

    if ctx.facts.is_identity_type(&ty.name) {
        out.push(
            Signal::new(
                "usage.identity-field-type",
                P,
                Role::Identifier,
                0.2,
                "used as an identity field type",
            )
            .corroborating(),
        );
    }

    Ok(out)
}
