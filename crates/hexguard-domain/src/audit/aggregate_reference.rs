use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use crate::graph::EdgeKind;
use hexguard_types::{ids, Role, Severity, ViolationRecord};

pub struct AggregateReference;

impl AuditRule for AggregateReference {
    fn id(&self) -> &'static str {
        ids::RULE_AGGREGATE_REFERENCE
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let mut out = Vec::new();
        for name in ctx.with_role(Role::AggregateRoot) {
            let mut targets: Vec<_> = ctx
                .graph
                .outgoing(name)
                .into_iter()
                .filter(|e| matches!(e.kind, EdgeKind::Reference | EdgeKind::Contains))
                .filter(|e| ctx.classification.role_of(&e.to) == Some(Role::AggregateRoot))
                .map(|e| e.to)
                .collect();
            targets.dedup();
            for target in targets {
                out.push(violation(
                    ids::RULE_AGGREGATE_REFERENCE,
                    Severity::Warning,
                    vec![name.clone(), target.clone()],
                    format!(
                        "aggregate root '{name}' holds aggregate root '{target}' directly; reference it by identifier"
                    ),
                ));
            }
        }
        Ok(out)
    }
}
