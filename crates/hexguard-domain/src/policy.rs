use crate::error::ConfigError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use hexguard_types::{Role, Severity, TypeName};
use std::collections::{BTreeMap, BTreeSet};

/// Compiled exclude patterns over qualified type names.
///
/// Patterns use package segments as path components: `*` stays inside one segment and
/// `**` spans any number of segments (`com.acme.**.generated.*`).
#[derive(Clone, Debug, Default)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl ExcludeSet {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = patterns.into_iter().map(Into::into).collect();
        if patterns.is_empty() {
            return Ok(Self::default());
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = GlobBuilder::new(&to_path(pattern))
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self {
            patterns,
            set: Some(set),
        })
    }

    pub fn is_excluded(&self, name: &TypeName) -> bool {
        self.set
            .as_ref()
            .is_some_and(|set| set.is_match(to_path(name.as_str())))
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn to_path(dotted: &str) -> String {
    dotted.replace('.', "/")
}

/// Immutable per-run enforcement configuration.
#[derive(Clone, Debug)]
pub struct PolicyConfig {
    pub profile: String,
    pub classification_threshold: f64,
    pub fail_on_unclassified: bool,
    pub unclassified_ratio_limit: Option<f64>,
    /// Any violation fails the run.
    pub fail_on_error: bool,
    pub error_on_critical: bool,
    pub error_on_blocker: bool,
    pub port_coverage_severity: Severity,
    pub disabled_rules: BTreeSet<String>,
    pub exclude: ExcludeSet,
    /// Priority-0 overrides, equivalent to an architecture annotation.
    pub explicit_roles: BTreeMap<TypeName, Role>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            profile: "standard".to_string(),
            classification_threshold: 0.5,
            fail_on_unclassified: false,
            unclassified_ratio_limit: None,
            fail_on_error: false,
            error_on_critical: false,
            error_on_blocker: true,
            port_coverage_severity: Severity::Warning,
            disabled_rules: BTreeSet::new(),
            exclude: ExcludeSet::default(),
            explicit_roles: BTreeMap::new(),
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.classification_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(
                self.classification_threshold,
            ));
        }
        if let Some(limit) = self.unclassified_ratio_limit {
            if !(0.0..=1.0).contains(&limit) {
                return Err(ConfigError::RatioOutOfRange(limit));
            }
        }
        if !matches!(
            self.port_coverage_severity,
            Severity::Warning | Severity::Critical
        ) {
            return Err(ConfigError::PortCoverageSeverity(
                self.port_coverage_severity.as_str().to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled_rules.contains(rule_id)
    }
}
