use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use crate::model::TypeKind;
use hexguard_types::{ids, Role, ViolationRecord};

/// Driven ports nothing implements.
///
/// Only meaningful once the model contains adapters: a snapshot of the domain alone
/// has none, and every port would be flagged.
pub struct PortCoverage;

impl AuditRule for PortCoverage {
    fn id(&self) -> &'static str {
        ids::RULE_PORT_COVERAGE
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let has_adapters = ctx
            .classification
            .iter()
            .filter(|r| r.role.is_port())
            .flat_map(|r| ctx.facts.implementors_of(&r.name))
            .any(|name| ctx.model.get(name).is_some_and(|d| d.kind == TypeKind::Class));
        if !has_adapters {
            return Ok(Vec::new());
        }

        let out = ctx
            .with_role(Role::DrivenPort)
            .filter(|name| !ctx.facts.has_implementors(name))
            .map(|name| {
                violation(
                    ids::RULE_PORT_COVERAGE,
                    ctx.config.port_coverage_severity,
                    vec![name.clone()],
                    format!("driven port '{name}' has no implementing adapter"),
                )
            })
            .collect();
        Ok(out)
    }
}
