//! Phase 4: architecture rules over the classified graph.
//!
//! Rules are independent [`AuditRule`] implementations reading one immutable
//! [`AuditContext`]. They run in parallel; a rule that fails or panics is reported as an
//! INFO `rule-error` violation and the others still run.

mod aggregate_cycle;
mod aggregate_reference;
mod aggregate_repository;
mod domain_purity;
mod entity_identity;
mod event_naming;
mod port_coverage;
mod port_interface;
mod unclassified_ratio;
mod utils;
mod value_object_immutable;

use crate::classify::{panic_message, Classification};
use crate::error::RuleError;
use crate::facts::ModelFacts;
use crate::fingerprint::fingerprint_for_violation;
use crate::graph::DependencyGraph;
use crate::model::{SymbolModel, TypeDescriptor};
use crate::policy::PolicyConfig;
use hexguard_types::{ids, AuditReport, Role, Severity, TypeName, ViolationRecord};
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

pub use aggregate_cycle::AggregateCycle;
pub use aggregate_reference::AggregateReference;
pub use aggregate_repository::AggregateRepository;
pub use domain_purity::DomainPurity;
pub use entity_identity::EntityIdentity;
pub use event_naming::EventNaming;
pub use port_coverage::PortCoverage;
pub use port_interface::PortInterface;
pub use unclassified_ratio::UnclassifiedRatio;
pub use value_object_immutable::ValueObjectImmutable;

/// Immutable snapshot every rule reads.
#[derive(Clone, Copy)]
pub struct AuditContext<'a> {
    pub graph: &'a DependencyGraph,
    pub classification: &'a Classification,
    pub model: &'a SymbolModel,
    pub facts: &'a ModelFacts,
    pub config: &'a PolicyConfig,
}

impl<'a> AuditContext<'a> {
    pub fn descriptor(&self, name: &TypeName) -> Result<&'a TypeDescriptor, RuleError> {
        self.model
            .get(name)
            .ok_or_else(|| RuleError::MissingDescriptor { name: name.clone() })
    }

    /// Classified types with `role`, in name order.
    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &'a TypeName> {
        self.classification.with_role(role)
    }
}

pub trait AuditRule: Send + Sync {
    fn id(&self) -> &'static str;

    fn check(&self, ctx: &AuditContext<'_>) -> Result<Vec<ViolationRecord>, RuleError>;
}

pub fn default_rules() -> Vec<Box<dyn AuditRule>> {
    vec![
        Box::new(AggregateCycle),
        Box::new(PortInterface),
        Box::new(PortCoverage),
        Box::new(ValueObjectImmutable),
        Box::new(DomainPurity),
        Box::new(UnclassifiedRatio),
        Box::new(EntityIdentity),
        Box::new(AggregateRepository),
        Box::new(AggregateReference),
        Box::new(EventNaming),
    ]
}

/// Run the default rule set.
pub fn audit(
    graph: &DependencyGraph,
    classification: &Classification,
    model: &SymbolModel,
    config: &PolicyConfig,
) -> AuditReport {
    let facts = ModelFacts::build(model);
    let ctx = AuditContext {
        graph,
        classification,
        model,
        facts: &facts,
        config,
    };
    audit_with(&default_rules(), &ctx)
}

/// Run `rules` (minus disabled ones) in parallel and merge their output in canonical order.
pub fn audit_with(rules: &[Box<dyn AuditRule>], ctx: &AuditContext<'_>) -> AuditReport {
    let mut violations: Vec<ViolationRecord> = rules
        .par_iter()
        .filter(|rule| {
            let enabled = ctx.config.is_rule_enabled(rule.id());
            if !enabled {
                debug!(rule = rule.id(), "rule disabled");
            }
            enabled
        })
        .map(|rule| run_rule(rule.as_ref(), ctx))
        .reduce(Vec::new, |mut a, b| {
            a.extend(b);
            a
        });

    for v in &mut violations {
        if v.fingerprint.is_none() {
            v.fingerprint = Some(fingerprint_for_violation(&v.rule_id, &v.involved));
        }
    }
    violations.sort_by(utils::compare_violations);

    let report = AuditReport::new(violations);
    info!(
        blocker = report.counts.blocker,
        critical = report.counts.critical,
        warning = report.counts.warning,
        info = report.counts.info,
        "audit finished"
    );
    report
}

fn run_rule(rule: &dyn AuditRule, ctx: &AuditContext<'_>) -> Vec<ViolationRecord> {
    match panic::catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
        Ok(Ok(found)) => {
            debug!(rule = rule.id(), violations = found.len(), "rule finished");
            found
        }
        Ok(Err(err)) => {
            warn!(rule = rule.id(), error = %err, "rule failed");
            vec![rule_error(rule.id(), &err.to_string())]
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            warn!(rule = rule.id(), %message, "rule panicked");
            vec![rule_error(rule.id(), &message)]
        }
    }
}

fn rule_error(rule_id: &str, message: &str) -> ViolationRecord {
    utils::violation(
        ids::RULE_ERROR,
        Severity::Info,
        vec![TypeName::new(rule_id)],
        format!("rule '{rule_id}' failed: {message}"),
    )
}
