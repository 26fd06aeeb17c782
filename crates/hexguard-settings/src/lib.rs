//! Config parsing and profile/preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ClassificationConfig, HexguardConfigV1, PolicySection, RuleConfig, SCHEMA_CONFIG_V1};
pub use presets::{preset, PROFILES};
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `hexguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<HexguardConfigV1> {
    let cfg: HexguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective policy: preset, then config file, then overrides.
pub fn resolve_config(
    cfg: HexguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
