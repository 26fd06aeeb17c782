use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use crate::graph::EdgeKind;
use hexguard_types::{ids, Role, Severity, TypeName, ViolationRecord};
use std::collections::BTreeSet;

const KINDS: [EdgeKind; 2] = [EdgeKind::Reference, EdgeKind::Contains];

/// Strongly connected groups of aggregate roots over reference/contains edges.
pub struct AggregateCycle;

impl AuditRule for AggregateCycle {
    fn id(&self) -> &'static str {
        ids::RULE_AGGREGATE_CYCLE
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let aggregates: BTreeSet<TypeName> = ctx.with_role(Role::AggregateRoot).cloned().collect();

        let mut out = Vec::new();
        for component in ctx.graph.cycles_among(&aggregates, &KINDS) {
            let path = ctx.graph.cycle_path(&component, &KINDS);
            let rendered: Vec<&str> = path.iter().map(TypeName::as_str).collect();
            let mut v = violation(
                ids::RULE_AGGREGATE_CYCLE,
                Severity::Blocker,
                component,
                format!("aggregate roots form a cycle: {}", rendered.join(" -> ")),
            );
            v.cycle = Some(path);
            out.push(v);
        }
        Ok(out)
    }
}
