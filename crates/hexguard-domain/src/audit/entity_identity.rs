use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use hexguard_types::{ids, Severity, ViolationRecord};

pub struct EntityIdentity;

impl AuditRule for EntityIdentity {
    fn id(&self) -> &'static str {
        ids::RULE_ENTITY_IDENTITY
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let mut out = Vec::new();
        for r in ctx.classification.iter().filter(|r| r.role.has_identity()) {
            let d = ctx.descriptor(&r.name)?;
            if !d.has_identity_field() {
                out.push(violation(
                    ids::RULE_ENTITY_IDENTITY,
                    Severity::Critical,
                    vec![r.name.clone()],
                    format!("{} '{}' declares no identity field", r.role, r.name),
                ));
            }
        }
        Ok(out)
    }
}
