//! Pure architecture analysis (no IO).
//!
//! Input: a [`SymbolModel`] of extracted type descriptors and a [`PolicyConfig`].
//! Output: per-type classifications, a dependency graph, an audit report and a verdict.
//!
//! Phases run in order; each consumes immutable snapshots of the previous ones:
//! 1. [`classify`] assigns each type a role from weighted signals.
//! 2. [`graph`] builds typed edges between classified types.
//! 3. [`audit`] checks architecture rules over the graph.
//! 4. [`verdict`] reduces the audit to pass/fail.

#![forbid(unsafe_code)]

pub mod audit;
pub mod cancel;
pub mod classify;
pub mod error;
pub mod facts;
pub mod fingerprint;
pub mod graph;
pub mod model;
pub mod policy;
pub mod signals;
pub mod verdict;

mod engine;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;

pub use cancel::CancellationToken;
pub use classify::{Classification, Classifier};
pub use engine::{analyze, Analysis, Engine, EngineOptions, RunOutcome};
pub use error::{ConfigError, EngineError, ExtractionError, ModelError, RuleError};
pub use graph::{build_graph, DependencyEdge, DependencyGraph, EdgeKind};
pub use model::{
    FieldDecl, MethodDecl, SourceLocation, SymbolModel, TypeDescriptor, TypeKind, TypeRef,
    Visibility,
};
pub use policy::{ExcludeSet, PolicyConfig};
pub use verdict::evaluate;
