use super::utils::violation;
use super::{AuditContext, AuditRule};
use crate::error::RuleError;
use crate::model::TypeDescriptor;
use hexguard_types::{ids, Role, Severity, ViolationRecord};
use std::collections::BTreeSet;

/// Package prefixes a domain element may not reference.
pub const INFRASTRUCTURE_PREFIXES: &[&str] = &[
    "javax.persistence",
    "jakarta.persistence",
    "org.springframework",
    "org.hibernate",
    "com.fasterxml.jackson",
    "javax.sql",
    "java.sql",
    "software.amazon",
    "com.stripe",
    "com.azure",
    "com.google.cloud",
    "org.apache.kafka",
    "com.rabbitmq",
    "javax.jms",
    "jakarta.jms",
    "javax.servlet",
    "jakarta.servlet",
    "javax.ws.rs",
    "jakarta.ws.rs",
    "javax.validation",
    "jakarta.validation",
];

pub struct DomainPurity;

impl AuditRule for DomainPurity {
    fn id(&self) -> &'static str {
        ids::RULE_DOMAIN_PURITY
    }

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError> {
        let mut out = Vec::new();
        for result in ctx.classification.iter() {
            if !result.role.is_domain_element() {
                continue;
            }
            let d = ctx.descriptor(&result.name)?;
            let forbidden = infrastructure_refs(d);
            if forbidden.is_empty() {
                continue;
            }
            let listed: Vec<&str> = forbidden.iter().map(String::as_str).collect();
            out.push(violation(
                ids::RULE_DOMAIN_PURITY,
                Severity::Critical,
                vec![result.name.clone()],
                format!(
                    "{} '{}' depends on infrastructure: {}",
                    role_label(result.role),
                    result.name,
                    listed.join(", ")
                ),
            ));
        }
        Ok(out)
    }
}

fn role_label(role: Role) -> String {
    role.as_str().to_ascii_lowercase().replace('_', " ")
}

/// Qualified names under an infrastructure prefix, from annotations and every type reference.
///
/// Unqualified references cannot be attributed to a package and are not reported.
fn infrastructure_refs(d: &TypeDescriptor) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for annotation in &d.annotations {
        let name = annotation.trim().trim_start_matches('@');
        let name = name.split('(').next().unwrap_or(name).trim();
        if is_infrastructure(name) {
            found.insert(name.to_string());
        }
    }
    for r in d.structural_refs().chain(d.signature_refs()) {
        let Ok(parsed) = r.parse() else { continue };
        for base in parsed.all_bases() {
            if is_infrastructure(base) {
                found.insert(base.to_string());
            }
        }
    }
    found
}

fn is_infrastructure(name: &str) -> bool {
    INFRASTRUCTURE_PREFIXES.iter().any(|prefix| {
        name.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}
