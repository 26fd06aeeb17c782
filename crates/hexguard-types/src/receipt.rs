use crate::{PortKind, Role, TypeName};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifier for hexguard reports.
pub const SCHEMA_REPORT_V1: &str = "hexguard.report.v1";

/// Violation severity. Ordering follows escalation: `Info < Warning < Critical < Blocker`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
    Blocker,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Blocker => "blocker",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Some(Severity::Info),
            "warning" | "warn" => Some(Severity::Warning),
            "critical" => Some(Severity::Critical),
            "blocker" => Some(Severity::Blocker),
            _ => None,
        }
    }
}

/// One signal that contributed to (or annotated) a classification decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Evidence {
    /// Stable signal identifier, e.g. `naming.id-suffix` or `below-threshold`.
    pub signal: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Human-readable signal value.
    pub detail: String,
    /// Weight contributed to the role's score; zero for diagnostic entries.
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoleScore {
    pub role: Role,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationResult {
    pub name: TypeName,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_kind: Option<PortKind>,
    pub confidence: f64,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runner_ups: Vec<RoleScore>,
}

impl ClassificationResult {
    pub fn is_classified(&self) -> bool {
        self.role != Role::Unclassified
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationSummary {
    pub total: u32,
    pub unclassified: u32,
    pub unclassified_ratio: f64,
    #[serde(default)]
    pub by_role: BTreeMap<Role, u32>,
}

impl ClassificationSummary {
    /// Compares the unrounded ratio; `unclassified_ratio` is rounded for display only.
    pub fn exceeds_unclassified_limit(&self, limit: f64) -> bool {
        self.total > 0 && f64::from(self.unclassified) / f64::from(self.total) > limit
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ViolationRecord {
    pub rule_id: String,
    pub severity: Severity,
    pub involved: Vec<TypeName>,
    pub message: String,

    /// Canonical cycle path for cycle rules, starting at the smallest member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<Vec<TypeName>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier for dedup and trending: a hash of `rule_id + involved types`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub critical: u32,
    pub blocker: u32,
}

impl SeverityCounts {
    pub fn tally(violations: &[ViolationRecord]) -> Self {
        let mut counts = Self::default();
        for v in violations {
            match v.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Critical => counts.critical += 1,
                Severity::Blocker => counts.blocker += 1,
            }
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Info => self.info,
            Severity::Warning => self.warning,
            Severity::Critical => self.critical,
            Severity::Blocker => self.blocker,
        }
    }

    pub fn total(&self) -> u32 {
        self.info + self.warning + self.critical + self.blocker
    }
}

/// All violations of one audit, already in canonical order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AuditReport {
    pub violations: Vec<ViolationRecord>,
    pub counts: SeverityCounts,
}

impl AuditReport {
    pub fn new(violations: Vec<ViolationRecord>) -> Self {
        let counts = SeverityCounts::tally(&violations);
        Self { violations, counts }
    }

    pub fn by_rule<'a>(&'a self, rule_id: &'a str) -> impl Iterator<Item = &'a ViolationRecord> {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub pass: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl Verdict {
    pub fn passed() -> Self {
        Self {
            pass: true,
            reasons: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Hexguard-specific payload embedded in the report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HexguardData {
    pub profile: String,
    pub classification_threshold: f64,
    pub types_scanned: u32,
    pub edges_total: u32,
    pub summary: ClassificationSummary,
    pub counts: SeverityCounts,
    #[serde(default)]
    pub classifications: Vec<ClassificationResult>,
}

/// A generic receipt/envelope with a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = HexguardData> {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub violations: Vec<ViolationRecord>,
    pub data: TData,
}

pub type HexguardReport = ReportEnvelope<HexguardData>;
