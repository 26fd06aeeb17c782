use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_CONFIG_V1: &str = "hexguard.config.v1";

/// `hexguard.toml` schema v1.
///
/// Every field is optional; anything left out comes from the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HexguardConfigV1 {
    /// Optional schema string for tooling (`hexguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `strict`, `standard` (default) or `lenient`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub policy: PolicySection,

    /// Map of rule_id -> config.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationConfig {
    /// Minimum winning score, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    /// Glob patterns over qualified names (`com.acme.generated.**`).
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Qualified name -> role, applied like an architecture annotation.
    #[serde(default)]
    pub roles: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_unclassified: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unclassified_ratio_limit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on_error: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_on_critical: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_on_blocker: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Severity override; only `port-coverage` accepts one (`warning` or `critical`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
