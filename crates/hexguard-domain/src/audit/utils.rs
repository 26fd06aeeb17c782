use hexguard_types::{lookup_explanation, Severity, TypeName, ViolationRecord};
use std::cmp::Ordering;

/// Build a violation with the rule's registered remediation as help text.
pub fn violation(
    rule_id: &str,
    severity: Severity,
    involved: Vec<TypeName>,
    message: String,
) -> ViolationRecord {
    let help = lookup_explanation(rule_id)
        .and_then(|e| e.remediation.lines().next().map(str::to_string))
        .filter(|h| !h.is_empty());
    ViolationRecord {
        rule_id: rule_id.to_string(),
        severity,
        involved,
        message,
        cycle: None,
        help,
        fingerprint: None,
    }
}

pub fn compare_violations(a: &ViolationRecord, b: &ViolationRecord) -> Ordering {
    // Ordering priority:
    // 1) severity (blocker -> info)
    // 2) rule_id
    // 3) first involved type
    // 4) message
    b.severity
        .cmp(&a.severity)
        .then(a.rule_id.cmp(&b.rule_id))
        .then(a.involved.first().cmp(&b.involved.first()))
        .then(a.message.cmp(&b.message))
}
