use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use hexguard_types::{ids, Role, Severity, ViolationRecord};

pub struct ValueObjectImmutable;

impl AuditRule for ValueObjectImmutable {
    fn id(&self) -> &'static str {
        ids::RULE_VALUE_OBJECT_IMMUTABLE
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let mut out = Vec::new();
        for name in ctx.with_role(Role::ValueObject) {
            let d = ctx.descriptor(name)?;
            let mutable: Vec<&str> = d
                .fields
                .iter()
                .filter(|f| f.has_setter)
                .map(|f| f.name.as_str())
                .collect();
            if !mutable.is_empty() {
                out.push(violation(
                    ids::RULE_VALUE_OBJECT_IMMUTABLE,
                    Severity::Critical,
                    vec![name.clone()],
                    format!(
                        "value object '{name}' exposes setters for: {}",
                        mutable.join(", ")
                    ),
                ));
            }
        }
        Ok(out)
    }
}
