//! Phase 1: per-type role assignment.
//!
//! Every type is classified independently from its own descriptor and the shared
//! [`ModelFacts`], so the work fans out over rayon with no coordination beyond the
//! final collect.

pub mod scoring;

use crate::cancel::CancellationToken;
use crate::facts::ModelFacts;
use crate::model::{SymbolModel, TypeDescriptor};
use crate::policy::PolicyConfig;
use crate::signals::{default_families, ExtractContext, Priority, Signal, SignalFamily};
use hexguard_types::{
    ids, ClassificationResult, ClassificationSummary, Evidence, Role, RoleScore, TypeName,
};
use rayon::prelude::*;
use scoring::{counted, port_kind_for, rank};
use std::collections::{BTreeMap, BTreeSet};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Read-only classification snapshot keyed by qualified name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    results: BTreeMap<TypeName, ClassificationResult>,
    skipped: Vec<TypeName>,
}

impl Classification {
    pub fn from_results(results: impl IntoIterator<Item = ClassificationResult>) -> Self {
        Self {
            results: results.into_iter().map(|r| (r.name.clone(), r)).collect(),
            skipped: Vec::new(),
        }
    }

    pub fn get(&self, name: &TypeName) -> Option<&ClassificationResult> {
        self.results.get(name)
    }

    pub fn role_of(&self, name: &TypeName) -> Option<Role> {
        self.results.get(name).map(|r| r.role)
    }

    /// Present and assigned a role other than `Unclassified`.
    pub fn is_classified(&self, name: &TypeName) -> bool {
        self.role_of(name).is_some_and(|r| r != Role::Unclassified)
    }

    /// Results in ascending qualified-name order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassificationResult> {
        self.results.values()
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &TypeName> {
        self.results
            .values()
            .filter(move |r| r.role == role)
            .map(|r| &r.name)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// False when cancellation stopped Phase 1 before every type was classified.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Types left unclassified because the run was cancelled.
    pub fn skipped(&self) -> &[TypeName] {
        &self.skipped
    }

    pub fn summary(&self) -> ClassificationSummary {
        let mut by_role = BTreeMap::new();
        for r in self.results.values() {
            *by_role.entry(r.role).or_insert(0u32) += 1;
        }
        let total = self.results.len() as u32;
        let unclassified = by_role.get(&Role::Unclassified).copied().unwrap_or(0);
        let unclassified_ratio = if total == 0 {
            0.0
        } else {
            scoring::round4(f64::from(unclassified) / f64::from(total))
        };
        ClassificationSummary {
            total,
            unclassified,
            unclassified_ratio,
            by_role,
        }
    }

    pub fn into_results(self) -> Vec<ClassificationResult> {
        self.results.into_values().collect()
    }
}

/// Signal families plus the scoring rules that combine them.
#[derive(Clone, Debug)]
pub struct Classifier {
    families: Vec<SignalFamily>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            families: default_families(),
        }
    }
}

impl Classifier {
    pub fn new(families: Vec<SignalFamily>) -> Self {
        Self { families }
    }

    pub fn with_family(mut self, family: SignalFamily) -> Self {
        self.families.push(family);
        self
    }

    pub fn classify(
        &self,
        model: &SymbolModel,
        config: &PolicyConfig,
        token: &CancellationToken,
    ) -> Classification {
        let facts = ModelFacts::build(model);
        self.classify_with_facts(model, &facts, config, token)
    }

    /// Classify every non-excluded type on the current rayon pool.
    pub fn classify_with_facts(
        &self,
        model: &SymbolModel,
        facts: &ModelFacts,
        config: &PolicyConfig,
        token: &CancellationToken,
    ) -> Classification {
        let ctx = ExtractContext { model, facts };
        let types: Vec<&TypeDescriptor> = model
            .iter()
            .filter(|d| !config.exclude.is_excluded(&d.name))
            .collect();
        debug!(
            types = types.len(),
            excluded = model.len() - types.len(),
            "classification started"
        );

        let outcomes: Vec<Result<ClassificationResult, TypeName>> = types
            .par_iter()
            .map(|ty| {
                if token.is_cancelled() {
                    Err(ty.name.clone())
                } else {
                    Ok(self.classify_type(ty, &ctx, config))
                }
            })
            .collect();

        let mut results = BTreeMap::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(r) => {
                    results.insert(r.name.clone(), r);
                }
                Err(name) => skipped.push(name),
            }
        }
        skipped.sort();

        if skipped.is_empty() {
            info!(types = results.len(), "classification finished");
        } else {
            warn!(
                classified = results.len(),
                skipped = skipped.len(),
                "classification cancelled"
            );
        }
        Classification { results, skipped }
    }

    fn classify_type(
        &self,
        ty: &TypeDescriptor,
        ctx: &ExtractContext<'_>,
        config: &PolicyConfig,
    ) -> ClassificationResult {
        let mut signals: Vec<Signal> = Vec::new();
        let mut diagnostics: Vec<Evidence> = Vec::new();

        if let Some(role) = config.explicit_roles.get(&ty.name) {
            signals.push(Signal::new(
                "config.explicit-role",
                Priority::Annotation,
                *role,
                1.0,
                "configured classification",
            ));
        }

        for family in &self.families {
            let run = panic::catch_unwind(AssertUnwindSafe(|| (family.extract)(ty, ctx)));
            match run {
                Ok(Ok(found)) => signals.extend(found),
                Ok(Err(err)) => {
                    warn!(type_name = %ty.name, family = family.name, error = %err, "signal family degraded");
                    diagnostics.push(Evidence {
                        signal: ids::EVIDENCE_EXTRACTION_DEGRADED.to_string(),
                        role: None,
                        detail: format!("{} signals skipped: {err}", family.name),
                        weight: 0.0,
                    });
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    warn!(type_name = %ty.name, family = family.name, %message, "signal extractor panicked");
                    return extraction_failure(ty, family.name, &message);
                }
            }
        }

        let mut result = if signals.iter().any(|s| s.priority == Priority::Annotation) {
            decide_annotated(ty, &signals)
        } else {
            decide_scored(ty, &signals, config.classification_threshold)
        };
        result.evidence.extend(diagnostics);
        result
    }
}

/// Classify with the default families, no cancellation, on the current rayon pool.
pub fn classify(model: &SymbolModel, config: &PolicyConfig) -> Classification {
    Classifier::default().classify(model, config, &CancellationToken::new())
}

fn evidence_for(s: &Signal) -> Evidence {
    Evidence {
        signal: s.id.to_string(),
        role: Some(s.role),
        detail: s.detail.clone(),
        weight: s.strength,
    }
}

fn sorted_evidence(signals: &[&Signal]) -> Vec<Evidence> {
    let mut ordered: Vec<&Signal> = signals.to_vec();
    ordered.sort_by(|a, b| a.priority.cmp(&b.priority).then(a.id.cmp(b.id)));
    ordered.into_iter().map(evidence_for).collect()
}

/// Annotations (and configured roles) override scoring. Configured roles win over
/// annotations; conflicting annotations resolve to the smallest role name.
fn decide_annotated(ty: &TypeDescriptor, signals: &[Signal]) -> ClassificationResult {
    let explicit: Vec<&Signal> = signals
        .iter()
        .filter(|s| s.priority == Priority::Annotation)
        .collect();

    let configured = explicit
        .iter()
        .find(|s| s.id == "config.explicit-role")
        .map(|s| s.role);
    let mut roles: Vec<Role> = explicit
        .iter()
        .map(|s| s.role)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    roles.sort_by_key(|r| r.as_str());
    let winner = configured.unwrap_or(roles[0]);

    let mut evidence = sorted_evidence(&explicit);
    if roles.len() > 1 {
        let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
        evidence.push(Evidence {
            signal: ids::EVIDENCE_ANNOTATION_CONFLICT.to_string(),
            role: Some(winner),
            detail: format!("conflicting roles {}; chose {}", names.join(", "), winner),
            weight: 0.0,
        });
    }

    let all: Vec<&Signal> = signals.iter().collect();
    let port_kind = port_kind_for(winner, &all);

    ClassificationResult {
        name: ty.name.clone(),
        role: winner,
        port_kind,
        confidence: 1.0,
        evidence,
        runner_ups: roles
            .into_iter()
            .filter(|r| *r != winner)
            .map(|role| RoleScore { role, score: 1.0 })
            .collect(),
    }
}

fn decide_scored(ty: &TypeDescriptor, signals: &[Signal], threshold: f64) -> ClassificationResult {
    let kept = counted(signals);
    let ranked = rank(&kept);
    let mut evidence = sorted_evidence(&kept);

    let Some(best) = ranked.first().copied() else {
        return ClassificationResult {
            name: ty.name.clone(),
            role: Role::Unclassified,
            port_kind: None,
            confidence: 0.0,
            evidence,
            runner_ups: Vec::new(),
        };
    };

    if best.score < threshold {
        evidence.push(Evidence {
            signal: ids::EVIDENCE_BELOW_THRESHOLD.to_string(),
            role: Some(best.role),
            detail: format!(
                "best score {} for {} is below threshold {}",
                best.score, best.role, threshold
            ),
            weight: 0.0,
        });
        return ClassificationResult {
            name: ty.name.clone(),
            role: Role::Unclassified,
            port_kind: None,
            confidence: 0.0,
            evidence,
            runner_ups: ranked
                .iter()
                .map(|s| RoleScore {
                    role: s.role,
                    score: s.score,
                })
                .collect(),
        };
    }

    ClassificationResult {
        name: ty.name.clone(),
        role: best.role,
        port_kind: port_kind_for(best.role, &kept),
        confidence: best.score,
        evidence,
        runner_ups: ranked
            .iter()
            .skip(1)
            .map(|s| RoleScore {
                role: s.role,
                score: s.score,
            })
            .collect(),
    }
}

fn extraction_failure(ty: &TypeDescriptor, family: &str, message: &str) -> ClassificationResult {
    ClassificationResult {
        name: ty.name.clone(),
        role: Role::Unclassified,
        port_kind: None,
        confidence: 0.0,
        evidence: vec![Evidence {
            signal: ids::EVIDENCE_EXTRACTION_ERROR.to_string(),
            role: None,
            detail: format!("{family} extractor failed: {message}"),
            weight: 0.0,
        }],
        runner_ups: Vec::new(),
    }
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
