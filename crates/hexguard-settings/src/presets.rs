use hexguard_domain::PolicyConfig;
use hexguard_types::{ids, Severity};

pub const PROFILES: &[&str] = &["strict", "standard", "lenient"];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> Option<PolicyConfig> {
    match profile {
        "strict" => Some(strict_profile()),
        "standard" => Some(PolicyConfig::default()),
        "lenient" => Some(lenient_profile()),
        _ => None,
    }
}

fn strict_profile() -> PolicyConfig {
    PolicyConfig {
        profile: "strict".to_string(),
        classification_threshold: 0.6,
        fail_on_unclassified: true,
        unclassified_ratio_limit: Some(0.1),
        error_on_critical: true,
        error_on_blocker: true,
        port_coverage_severity: Severity::Critical,
        ..PolicyConfig::default()
    }
}

fn lenient_profile() -> PolicyConfig {
    // Report-only: nothing fails the run unless the repo config opts back in.
    let mut cfg = PolicyConfig {
        profile: "lenient".to_string(),
        classification_threshold: 0.4,
        error_on_blocker: false,
        ..PolicyConfig::default()
    };
    cfg.disabled_rules.insert(ids::RULE_EVENT_NAMING.to_string());
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_profile_resolves_and_validates() {
        for name in PROFILES {
            let cfg = preset(name).expect("known profile");
            assert_eq!(cfg.profile, *name);
            cfg.validate().expect("valid preset");
        }
        assert!(preset("paranoid").is_none());
    }
}
