use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use crate::model::TypeKind;
use hexguard_types::{ids, Severity, ViolationRecord};

pub struct PortInterface;

impl AuditRule for PortInterface {
    fn id(&self) -> &'static str {
        ids::RULE_PORT_INTERFACE
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let mut out = Vec::new();
        for r in ctx.classification.iter().filter(|r| r.role.is_port()) {
            let d = ctx.descriptor(&r.name)?;
            if d.kind != TypeKind::Interface {
                out.push(violation(
                    ids::RULE_PORT_INTERFACE,
                    Severity::Critical,
                    vec![r.name.clone()],
                    format!(
                        "{} '{}' is declared as a {}; ports must be interfaces",
                        r.role,
                        r.name,
                        d.kind.as_str()
                    ),
                ));
            }
        }
        Ok(out)
    }
}
