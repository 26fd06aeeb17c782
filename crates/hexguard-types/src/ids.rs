//! Stable identifiers for audit rules and classification evidence.
//!
//! Rule IDs are kebab-case and appear verbatim in reports and config files.

// Audit rules
pub const RULE_AGGREGATE_CYCLE: &str = "aggregate-cycle";
pub const RULE_PORT_INTERFACE: &str = "port-interface";
pub const RULE_PORT_COVERAGE: &str = "port-coverage";
pub const RULE_VALUE_OBJECT_IMMUTABLE: &str = "value-object-immutable";
pub const RULE_DOMAIN_PURITY: &str = "domain-purity";
pub const RULE_UNCLASSIFIED_RATIO: &str = "unclassified-ratio";
pub const RULE_ENTITY_IDENTITY: &str = "entity-identity";
pub const RULE_AGGREGATE_REPOSITORY: &str = "aggregate-repository";
pub const RULE_AGGREGATE_REFERENCE: &str = "aggregate-reference";
pub const RULE_EVENT_NAMING: &str = "event-naming";

// Synthetic diagnostics
pub const RULE_ERROR: &str = "rule-error";
pub const EVIDENCE_EXTRACTION_ERROR: &str = "extraction-error";
pub const EVIDENCE_EXTRACTION_DEGRADED: &str = "extraction-degraded";
pub const EVIDENCE_BELOW_THRESHOLD: &str = "below-threshold";
pub const EVIDENCE_ANNOTATION_CONFLICT: &str = "annotation-conflict";

// Tool-level
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";
