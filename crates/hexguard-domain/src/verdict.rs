//! Phase 5: reduce an audit and a classification summary to pass/fail.

use crate::policy::PolicyConfig;
use hexguard_types::{AuditReport, ClassificationSummary, Verdict};

/// Pure policy evaluation. Every triggered condition contributes one reason.
///
/// A configured `unclassified_ratio_limit` fails the run on its own when exceeded,
/// whether or not `fail_on_unclassified` is set.
pub fn evaluate(
    audit: &AuditReport,
    summary: &ClassificationSummary,
    config: &PolicyConfig,
) -> Verdict {
    let mut reasons = Vec::new();

    if config.fail_on_unclassified && summary.unclassified > 0 {
        reasons.push(format!(
            "{} of {} types are unclassified",
            summary.unclassified, summary.total
        ));
    }
    if let Some(limit) = config.unclassified_ratio_limit {
        if summary.exceeds_unclassified_limit(limit) {
            reasons.push(format!(
                "unclassified ratio {} exceeds limit {limit}",
                summary.unclassified_ratio
            ));
        }
    }
    if config.error_on_blocker && audit.counts.blocker > 0 {
        reasons.push(format!("{} blocker violation(s)", audit.counts.blocker));
    }
    if config.error_on_critical && audit.counts.critical > 0 {
        reasons.push(format!("{} critical violation(s)", audit.counts.critical));
    }
    if config.fail_on_error && !audit.violations.is_empty() {
        reasons.push(format!(
            "{} violation(s) with fail_on_error enabled",
            audit.violations.len()
        ));
    }

    Verdict {
        pass: reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexguard_types::{Severity, TypeName, ViolationRecord};

    fn report(severities: &[Severity]) -> AuditReport {
        let violations = severities
            .iter()
            .map(|&severity| ViolationRecord {
                rule_id: "port-interface".to_string(),
                severity,
                involved: vec![TypeName::new("com.acme.Port")],
                message: "m".to_string(),
                cycle: None,
                help: None,
                fingerprint: None,
            })
            .collect();
        AuditReport::new(violations)
    }

    fn summary(total: u32, unclassified: u32) -> ClassificationSummary {
        ClassificationSummary {
            total,
            unclassified,
            unclassified_ratio: ((f64::from(unclassified) / f64::from(total)) * 10_000.0).round()
                / 10_000.0,
            ..ClassificationSummary::default()
        }
    }

    #[test]
    fn critical_passes_unless_escalated() {
        let audit = report(&[Severity::Critical]);
        let s = summary(4, 0);

        let lenient = PolicyConfig {
            error_on_critical: false,
            error_on_blocker: true,
            ..PolicyConfig::default()
        };
        assert!(evaluate(&audit, &s, &lenient).pass);

        let strict = PolicyConfig {
            error_on_critical: true,
            ..lenient
        };
        let verdict = evaluate(&audit, &s, &strict);
        assert!(!verdict.pass);
        assert_eq!(verdict.reasons, vec!["1 critical violation(s)".to_string()]);
    }

    #[test]
    fn blocker_fails_by_default() {
        let verdict = evaluate(&report(&[Severity::Blocker]), &summary(2, 0), &PolicyConfig::default());
        assert!(!verdict.pass);
        assert!(verdict.reasons[0].contains("blocker"));
    }

    #[test]
    fn half_unclassified_fails_when_escalated() {
        let config = PolicyConfig {
            fail_on_unclassified: true,
            ..PolicyConfig::default()
        };
        let verdict = evaluate(&AuditReport::default(), &summary(4, 2), &config);
        assert!(!verdict.pass);
        assert_eq!(verdict.reasons, vec!["2 of 4 types are unclassified".to_string()]);

        assert!(evaluate(&AuditReport::default(), &summary(4, 2), &PolicyConfig::default()).pass);
    }

    #[test]
    fn ratio_limit_and_fail_on_error_each_add_a_reason() {
        let config = PolicyConfig {
            fail_on_error: true,
            unclassified_ratio_limit: Some(0.25),
            ..PolicyConfig::default()
        };
        let verdict = evaluate(&report(&[Severity::Info]), &summary(4, 2), &config);
        assert!(!verdict.pass);
        assert_eq!(verdict.reasons.len(), 2);
        assert!(verdict.reasons[0].contains("exceeds limit 0.25"));
        assert!(verdict.reasons[1].contains("fail_on_error"));
    }

    #[test]
    fn ratio_limit_compares_the_unrounded_ratio() {
        // 3 of 9 rounds to 0.3333 but is above 0.33333.
        let s = summary(9, 3);
        assert_eq!(s.unclassified_ratio, 0.3333);
        let config = PolicyConfig {
            unclassified_ratio_limit: Some(0.33333),
            ..PolicyConfig::default()
        };
        let verdict = evaluate(&AuditReport::default(), &s, &config);
        assert!(!verdict.pass);
        assert!(verdict.reasons[0].contains("exceeds limit 0.33333"));

        let at_limit = PolicyConfig {
            unclassified_ratio_limit: Some(0.5),
            ..PolicyConfig::default()
        };
        assert!(evaluate(&AuditReport::default(), &summary(4, 2), &at_limit).pass);
    }

    #[test]
    fn clean_audit_passes_under_every_policy() {
        let configs = [
            PolicyConfig::default(),
            PolicyConfig {
                fail_on_error: true,
                error_on_critical: true,
                fail_on_unclassified: true,
                unclassified_ratio_limit: Some(0.0),
                ..PolicyConfig::default()
            },
        ];
        for config in &configs {
            assert!(evaluate(&AuditReport::default(), &summary(4, 0), config).pass);
        }
    }
}
