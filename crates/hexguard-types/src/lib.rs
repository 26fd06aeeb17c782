//! Stable DTOs and IDs used across the hexguard workspace.
//!
//! This crate is intentionally boring:
//! - qualified type names and architectural roles
//! - classification, violation, and verdict records produced by the engine
//! - the emitted report envelope
//! - stable rule IDs and the explain registry

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod name;
pub mod receipt;
pub mod role;

pub use explain::{all_rule_ids, lookup_explanation, ExamplePair, Explanation};
pub use name::TypeName;
pub use receipt::{
    AuditReport, ClassificationResult, ClassificationSummary, Evidence, HexguardData,
    HexguardReport, ReportEnvelope, RoleScore, Severity, SeverityCounts, ToolMeta, Verdict,
    ViolationRecord, SCHEMA_REPORT_V1,
};
pub use role::{PortKind, Role, UnknownRole};
