use crate::model::{HexguardConfigV1, SCHEMA_CONFIG_V1};
use crate::presets::{self, PROFILES};
use anyhow::Context;
use hexguard_domain::{ExcludeSet, PolicyConfig};
use hexguard_types::{all_rule_ids, ids, Role, Severity, TypeName};

/// Command-line values; each one beats the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub classification_threshold: Option<f64>,
    pub fail_on_unclassified: Option<bool>,
    pub unclassified_ratio_limit: Option<f64>,
    pub fail_on_error: Option<bool>,
    pub error_on_critical: Option<bool>,
    /// Appended to the config file's exclude patterns.
    pub exclude: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: PolicyConfig,
}

pub fn resolve_config(
    cfg: HexguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref() {
        if schema != SCHEMA_CONFIG_V1 {
            anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
        }
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "standard".to_string());
    let mut policy = presets::preset(&profile).with_context(|| {
        format!("unknown profile: {profile} (expected one of {})", PROFILES.join("|"))
    })?;

    // Config file
    let classification = &cfg.classification;
    if let Some(t) = classification.threshold {
        policy.classification_threshold = t;
    }
    for (name, role) in &classification.roles {
        policy
            .explicit_roles
            .insert(TypeName::new(name.as_str()), parse_role(name, role)?);
    }

    let p = &cfg.policy;
    if let Some(v) = p.fail_on_unclassified {
        policy.fail_on_unclassified = v;
    }
    if let Some(v) = p.unclassified_ratio_limit {
        policy.unclassified_ratio_limit = Some(v);
    }
    if let Some(v) = p.fail_on_error {
        policy.fail_on_error = v;
    }
    if let Some(v) = p.error_on_critical {
        policy.error_on_critical = v;
    }
    if let Some(v) = p.error_on_blocker {
        policy.error_on_blocker = v;
    }

    // per-rule overrides
    for (rule_id, rc) in &cfg.rules {
        if !all_rule_ids().contains(&rule_id.as_str()) {
            anyhow::bail!("unknown rule in [rules]: {rule_id}");
        }
        match rc.enabled {
            Some(false) => {
                policy.disabled_rules.insert(rule_id.clone());
            }
            Some(true) => {
                policy.disabled_rules.remove(rule_id);
            }
            None => {}
        }
        if let Some(sev) = rc.severity.as_deref() {
            if rule_id != ids::RULE_PORT_COVERAGE {
                anyhow::bail!("rule {rule_id} does not accept a severity override");
            }
            policy.port_coverage_severity = parse_severity(sev)
                .with_context(|| format!("invalid severity for {rule_id}"))?;
        }
    }

    // CLI overrides
    if let Some(t) = overrides.classification_threshold {
        policy.classification_threshold = t;
    }
    if let Some(v) = overrides.fail_on_unclassified {
        policy.fail_on_unclassified = v;
    }
    if let Some(v) = overrides.unclassified_ratio_limit {
        policy.unclassified_ratio_limit = Some(v);
    }
    if let Some(v) = overrides.fail_on_error {
        policy.fail_on_error = v;
    }
    if let Some(v) = overrides.error_on_critical {
        policy.error_on_critical = v;
    }

    let patterns = classification.exclude.iter().chain(&overrides.exclude);
    policy.exclude = ExcludeSet::new(patterns).context("invalid exclude pattern")?;

    policy.validate().context("invalid policy")?;
    Ok(ResolvedConfig { policy })
}

fn parse_role(name: &str, v: &str) -> anyhow::Result<Role> {
    let role: Role = v
        .parse()
        .with_context(|| format!("invalid role for {name}"))?;
    if role == Role::Unclassified {
        anyhow::bail!("invalid role for {name}: UNCLASSIFIED cannot be assigned");
    }
    Ok(role)
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match Severity::parse(v) {
        Some(s @ (Severity::Warning | Severity::Critical)) => Ok(s),
        _ => anyhow::bail!("unknown severity: {v} (expected warning|critical)"),
    }
}
