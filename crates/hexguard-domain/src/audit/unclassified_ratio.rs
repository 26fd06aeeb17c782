use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use hexguard_types::{ids, Role, Severity, TypeName, ViolationRecord};

pub struct UnclassifiedRatio;

impl AuditRule for UnclassifiedRatio {
    fn id(&self) -> &'static str {
        ids::RULE_UNCLASSIFIED_RATIO
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let Some(limit) = ctx.config.unclassified_ratio_limit else {
            return Ok(Vec::new());
        };
        let summary = ctx.classification.summary();
        if !summary.exceeds_unclassified_limit(limit) {
            return Ok(Vec::new());
        }

        let severity = if ctx.config.fail_on_unclassified {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let involved: Vec<TypeName> = ctx.with_role(Role::Unclassified).cloned().collect();
        Ok(vec![violation(
            ids::RULE_UNCLASSIFIED_RATIO,
            severity,
            involved,
            format!(
                "{} of {} types are unclassified (ratio {} exceeds limit {})",
                summary.unclassified, summary.total, summary.unclassified_ratio, limit
            ),
        )])
    }
}
