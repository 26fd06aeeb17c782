use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use hexguard_types::{ids, Role, Severity, ViolationRecord};

/// Aggregate roots no repository persists. Skipped for models without driven ports.
pub struct AggregateRepository;

impl AuditRule for AggregateRepository {
    fn id(&self) -> &'static str {
        ids::RULE_AGGREGATE_REPOSITORY
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        if ctx.with_role(Role::DrivenPort).next().is_none() {
            return Ok(Vec::new());
        }
        let out = ctx
            .with_role(Role::AggregateRoot)
            .filter(|name| !ctx.facts.is_repository_managed(name))
            .map(|name| {
                violation(
                    ids::RULE_AGGREGATE_REPOSITORY,
                    Severity::Warning,
                    vec![name.clone()],
                    format!("aggregate root '{name}' is not managed by any repository"),
                )
            })
            .collect();
        Ok(out)
    }
}
